use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Important info about a video
#[derive(Clone, PartialEq)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    pub view_count: u64,
}

impl VideoRecord {
    /// Publish time as seconds since the Unix epoch, the x value used when charting
    pub fn epoch_seconds(&self) -> i64 {
        self.published_at.timestamp()
    }
}

impl std::fmt::Debug for VideoRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "VideoRecord{{id: {:?}, title: {:?}, published_at: {:?}, view_count: {}}}",
            self.id, self.title, self.published_at, self.view_count,
        )
    }
}

/// All videos found for one user, keyed by video ID.
///
/// Iteration order is arbitrary. Anything needing chronological order has
/// to sort for itself.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Catalog {
    videos: HashMap<String, VideoRecord>,
}

impl Catalog {
    pub fn new() -> Catalog {
        Catalog::default()
    }

    /// Add a video, replacing any existing record with the same ID
    pub fn insert(&mut self, video: VideoRecord) {
        self.videos.insert(video.id.clone(), video);
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VideoRecord> {
        self.videos.values()
    }
}

/// Where a report or chart is written. `-` on the command line means stdout.
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    pub fn from_arg(arg: &str) -> Destination {
        if arg == "-" {
            Destination::Stdout
        } else {
            Destination::File(arg.into())
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Stdout => write!(f, "<stdout>"),
            Destination::File(p) => write!(f, "{}", p.display()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    fn record(id: &str, views: u64) -> VideoRecord {
        VideoRecord {
            id: id.into(),
            title: format!("Video {}", id),
            description: "".into(),
            published_at: Utc.with_ymd_and_hms(2012, 3, 4, 5, 6, 7).unwrap(),
            view_count: views,
        }
    }

    #[test]
    fn test_insert_replaces_same_id() {
        let mut c = Catalog::new();
        c.insert(record("a", 1));
        c.insert(record("b", 2));
        c.insert(record("a", 3));
        assert_eq!(c.len(), 2);
        let a = c.iter().find(|v| v.id == "a").unwrap();
        assert_eq!(a.view_count, 3);
    }

    #[test]
    fn test_epoch_seconds() {
        let r = record("a", 1);
        assert_eq!(r.epoch_seconds(), 1330837567);
    }

    #[test]
    fn test_destination_from_arg() {
        assert_eq!(Destination::from_arg("-"), Destination::Stdout);
        assert_eq!(
            Destination::from_arg("out.png"),
            Destination::File("out.png".into())
        );
    }
}
