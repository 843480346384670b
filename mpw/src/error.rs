/// Faults are not recoverable inside the generator: they indicate misuse
/// (asking for a token before logging in) or a corrupt template table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("not logged in")]
    NotLoggedIn,
    #[error("unhandled template character class `{0}`")]
    UnknownTemplateClass(char),
    #[error(transparent)]
    Scrypt(#[from] scrypt::Error),
}
