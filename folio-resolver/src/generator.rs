//! Random short id sources.

use uuid::Uuid;

/// Draws candidate short ids.
///
/// Candidates are verified against the index before use, so a source only
/// has to make collisions unlikely, not impossible.
pub trait IdSource: Send + Sync {
    fn draw(&self) -> String;
}

/// Random UUID v4 tokens in lowercase hyphenated form.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomUuid;

impl IdSource for RandomUuid {
    fn draw(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
