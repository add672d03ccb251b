//! Navigation sink for auth-driven redirects.

use std::sync::Mutex;

/// Where the client sends the user when authentication fails.
///
/// In the browser build this is a hard `location.assign`; embedders plug in
/// whatever their platform's navigation primitive is. The 401 interceptor
/// and the guards are the only callers.
pub trait Navigator: Send + Sync {
    /// The path currently being displayed.
    fn current_path(&self) -> String;

    /// Navigate to the given path, replacing the current view.
    fn assign(&self, path: &str);
}

/// A navigator that goes nowhere. The default for headless embedders that
/// only want the API surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn current_path(&self) -> String {
        "/".to_owned()
    }

    fn assign(&self, path: &str) {
        tracing::debug!(path, "navigation requested (noop navigator)");
    }
}

/// A navigator that records every assignment. Used by tests to assert
/// redirect behavior without a browser.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    current: Mutex<String>,
    assignments: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Create a recorder positioned at the given path.
    #[must_use]
    pub fn at(path: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(path.into()),
            assignments: Mutex::new(Vec::new()),
        }
    }

    /// Every path assigned so far, in order.
    #[must_use]
    pub fn assignments(&self) -> Vec<String> {
        self.assignments
            .lock()
            .map(|a| a.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.current
            .lock()
            .map(|c| c.clone())
            .unwrap_or_else(|_| "/".to_owned())
    }

    fn assign(&self, path: &str) {
        if let Ok(mut current) = self.current.lock() {
            *current = path.to_owned();
        }
        if let Ok(mut assignments) = self.assignments.lock() {
            assignments.push(path.to_owned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_navigator_tracks_assignments() {
        let nav = RecordingNavigator::at("/dashboard");
        assert_eq!(nav.current_path(), "/dashboard");

        nav.assign("/sign-in");
        assert_eq!(nav.current_path(), "/sign-in");
        assert_eq!(nav.assignments(), vec!["/sign-in".to_owned()]);
    }
}
