/// Reasons a submitted move is refused. The display text is what the
/// offending player receives through `Player::report`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("Coordinates ({x}, {y}) not in bounds!")]
    OutOfBounds { x: i32, y: i32 },

    #[error("There is already a token at ({x}, {y})!")]
    Occupied { x: i32, y: i32 },

    #[error("You may not place a token into a capture!")]
    WouldBeCaptured,

    #[error("You may not play a token that would cause a double three!")]
    DoubleThree,
}

/// Misuse of the game or player API. These are not recoverable by retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("a game needs exactly {required} players, got {given}")]
    PlayerCount { required: usize, given: usize },

    #[error("{name} only supports playing one game at a time")]
    AlreadyInGame { name: String },
}
