//! Types shared between the API and the database.

mod choice;
pub use choice::{Choice, InvalidChoice};

/// The one question this poll asks. Every vote carries a copy of it.
pub const QUESTION: &str = "Est-ce que François Bayrou nous manque ?";

/// Shown in place of the pseudo of a voter whose account no longer exists.
pub const DELETED_USER_PSEUDO: &str = "Utilisateur supprimé";
