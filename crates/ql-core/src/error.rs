/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by invariant checks on the domain model.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Two party members share the same name.
    #[error("duplicate character name: \"{0}\"")]
    DuplicateCharacter(String),

    /// A character was introduced with negative hit points.
    #[error("character \"{name}\" has negative hp ({hp})")]
    NegativeHp {
        /// The offending character.
        name: String,
        /// The hit points it was loaded with.
        hp: i32,
    },

    /// A name did not resolve to a party member.
    #[error("unknown character: \"{0}\"")]
    UnknownCharacter(String),

    /// A token did not parse as an action.
    #[error("unknown action: \"{0}\"")]
    UnknownAction(String),
}
