//! Media identity types used to drive source resolution.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of title being watched.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Feature film, addressed by id alone.
    Movie,
    /// Television show, addressed by id plus season and episode.
    Tv,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Movie => write!(f, "movie"),
            MediaType::Tv => write!(f, "tv"),
        }
    }
}

/// Errors for malformed media references.
///
/// These are rejected before any network call is made.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MediaError {
    /// The reference has no id.
    #[error("Media reference is missing an id")]
    MissingId,

    /// A tv reference must carry season and episode together.
    #[error("TV reference '{id}' requires both season and episode")]
    IncompleteTvReference {
        /// The id of the incomplete reference.
        id: String,
    },

    /// A movie reference must not carry season or episode.
    #[error("Movie reference '{id}' cannot carry season or episode")]
    EpisodeOnMovie {
        /// The id of the malformed reference.
        id: String,
    },
}

/// Identity tuple describing which title or episode is being watched.
///
/// Changing any field produces a different identity; the playback session uses
/// this to supersede in-flight resolutions when the user navigates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MediaReference {
    /// Movie or tv.
    pub media_type: MediaType,
    /// External database id for the title.
    pub id: String,
    /// Season number, required for tv.
    pub season: Option<u32>,
    /// Episode number, required for tv.
    pub episode: Option<u32>,
}

impl MediaReference {
    /// Builds a validated movie reference.
    ///
    /// # Errors
    /// - `MediaError::MissingId` - Empty id
    pub fn movie(id: impl Into<String>) -> Result<Self, MediaError> {
        let reference = Self {
            media_type: MediaType::Movie,
            id: id.into(),
            season: None,
            episode: None,
        };
        reference.validate()?;
        Ok(reference)
    }

    /// Builds a validated tv episode reference.
    ///
    /// # Errors
    /// - `MediaError::MissingId` - Empty id
    pub fn episode(id: impl Into<String>, season: u32, episode: u32) -> Result<Self, MediaError> {
        let reference = Self {
            media_type: MediaType::Tv,
            id: id.into(),
            season: Some(season),
            episode: Some(episode),
        };
        reference.validate()?;
        Ok(reference)
    }

    /// Checks the reference invariants: id present, season and episode both
    /// present for tv and both absent for movies.
    ///
    /// The resolver calls this before issuing any request so a malformed
    /// reference never produces a malformed URL.
    ///
    /// # Errors
    /// - `MediaError::MissingId` - Empty id
    /// - `MediaError::IncompleteTvReference` - Tv reference with a partial season/episode pair
    /// - `MediaError::EpisodeOnMovie` - Movie reference carrying season or episode
    pub fn validate(&self) -> Result<(), MediaError> {
        if self.id.is_empty() {
            return Err(MediaError::MissingId);
        }
        match self.media_type {
            MediaType::Tv => {
                if self.season.is_none() || self.episode.is_none() {
                    return Err(MediaError::IncompleteTvReference {
                        id: self.id.clone(),
                    });
                }
            }
            MediaType::Movie => {
                if self.season.is_some() || self.episode.is_some() {
                    return Err(MediaError::EpisodeOnMovie {
                        id: self.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for MediaReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.season, self.episode) {
            (Some(season), Some(episode)) => {
                write!(f, "{}/{} s{season}e{episode}", self.media_type, self.id)
            }
            _ => write!(f, "{}/{}", self.media_type, self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_reference_is_valid() {
        let reference = MediaReference::movie("550").unwrap();
        assert_eq!(reference.media_type, MediaType::Movie);
        assert_eq!(reference.id, "550");
        assert!(reference.season.is_none());
    }

    #[test]
    fn empty_id_is_rejected() {
        assert_eq!(MediaReference::movie("").unwrap_err(), MediaError::MissingId);
    }

    #[test]
    fn partial_tv_reference_is_rejected() {
        let reference = MediaReference {
            media_type: MediaType::Tv,
            id: "1399".to_string(),
            season: Some(1),
            episode: None,
        };
        assert!(matches!(
            reference.validate(),
            Err(MediaError::IncompleteTvReference { .. })
        ));
    }

    #[test]
    fn movie_with_season_is_rejected() {
        let reference = MediaReference {
            media_type: MediaType::Movie,
            id: "550".to_string(),
            season: Some(1),
            episode: Some(1),
        };
        assert!(matches!(
            reference.validate(),
            Err(MediaError::EpisodeOnMovie { .. })
        ));
    }

    #[test]
    fn identity_changes_with_episode() {
        let a = MediaReference::episode("1399", 1, 1).unwrap();
        let b = MediaReference::episode("1399", 1, 2).unwrap();
        assert_ne!(a, b);
    }
}
