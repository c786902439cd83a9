use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridfallError {
    #[error("Unknown enemy template: {0}")]
    UnknownTemplate(String),

    #[error("Spawn point ({0}, {1}) is outside the battle grid")]
    SpawnOutOfBounds(i32, i32),

    #[error("Not enough roster records for {spawns} friendly spawn points ({records} available)")]
    RosterTooSmall { spawns: usize, records: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GridfallError>;
