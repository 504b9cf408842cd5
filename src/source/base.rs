use thiserror::Error;

/*
GData v2 uploads feed, `alt=json` rendition (fields we use):
{
  feed: {
    entry: [
      {
        id: { $t: String },
        published: { $t: String },
        title: { $t: String },
        media$group: {
          media$title: { $t: String },
          media$description: { $t: String },
        },
        yt$statistics: { viewCount: String, favoriteCount: String },
      }
    ]
  }
}
`entry` is omitted entirely when the page is empty.
*/

/// A GData text node, `{"$t": "..."}`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GDataText {
    #[serde(rename = "$t", default)]
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RawMediaGroup {
    #[serde(rename = "media$title")]
    pub title: Option<GDataText>,
    #[serde(rename = "media$description")]
    pub description: Option<GDataText>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawStatistics {
    pub view_count: Option<String>,
}

/// One video entry exactly as the feed delivered it. Every field is optional
/// here, checking for them is up to the entry parser.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    pub id: Option<GDataText>,
    pub published: Option<GDataText>,
    pub title: Option<GDataText>,
    #[serde(rename = "media$group")]
    pub media_group: Option<RawMediaGroup>,
    #[serde(rename = "yt$statistics")]
    pub statistics: Option<RawStatistics>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub(crate) struct FeedDocument {
    pub feed: FeedBody,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub(crate) struct FeedBody {
    #[serde(default)]
    pub entry: Vec<RawEntry>,
}

/// One page of the uploads feed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPage {
    pub entries: Vec<RawEntry>,
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid feed URL {0:?}")]
    InvalidUrl(String),

    #[error("Request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: attohttpc::Error,
    },

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to parse feed from {url}")]
    Envelope {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of a user's uploads feed, one page per call.
pub trait FeedSource {
    /// Fetch up to `page_size` entries starting at the 1-based `start_index`.
    /// Makes exactly one request and never retries.
    fn fetch_page(
        &self,
        username: &str,
        start_index: usize,
        page_size: usize,
    ) -> Result<RawPage, FetchError>;
}
