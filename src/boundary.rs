use std::fmt;

/// Non-fatal conditions met while running a flow.
/// These are reported to the operator and never stop the flow.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The secondary manifest carries a different version than the primary one
    ManifestsOutOfSync {
        primary: String,
        secondary: String,
        secondary_version: String,
    },
    /// Build failed but the build policy only asks for a warning
    BuildFailed { reason: String },
    /// No build command is configured although the policy requires one
    NoBuildCommand,
    /// A notification could not be delivered
    NotificationFailed { reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::ManifestsOutOfSync {
                primary,
                secondary,
                secondary_version,
            } => write!(
                f,
                "{} holds version {} which differs from {}; it will be overwritten on the next bump",
                secondary, secondary_version, primary
            ),
            BoundaryWarning::BuildFailed { reason } => {
                write!(f, "Build failed, continuing anyway: {}", reason)
            }
            BoundaryWarning::NoBuildCommand => {
                write!(f, "No build command configured; skipping build")
            }
            BoundaryWarning::NotificationFailed { reason } => {
                write!(f, "Could not send notification: {}", reason)
            }
        }
    }
}
