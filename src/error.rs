use thiserror::Error;

use crate::tile::TileKind;

/// Configuration problems that stop the process before any run starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("GITHUB_TOKEN environment variable not set (create one at https://github.com/settings/tokens)")]
    MissingToken,

    #[error("cannot determine repository owner; set GITHUB_REPOSITORY_OWNER or GITHUB_REPOSITORY")]
    MissingOwner,

    #[error("{kind} positional band is inverted (top {top} < floor {floor})")]
    InvertedBand { kind: TileKind, top: i64, floor: i64 },

    #[error("priority override for `{kind}` tiles is not supported")]
    UnsupportedOverrideKind { kind: TileKind },

    #[error("priority override for {kind} has an empty keyword")]
    EmptyKeyword { kind: TileKind },

    #[error(
        "{kind} override `{keyword}` priority {priority} collides with the {band} positional band {floor}..={top}"
    )]
    OverlappingBand {
        kind: TileKind,
        keyword: String,
        priority: i64,
        band: TileKind,
        floor: i64,
        top: i64,
    },
}
