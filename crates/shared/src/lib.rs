pub mod conversation;
pub mod research;
pub mod stage;
pub mod text;

pub use conversation::{ConversationEntry, Role};
pub use research::{Document, SearchResult, SearchSource};
pub use stage::Stage;

pub mod settings {
    use serde::{Deserialize, Serialize};

    fn default_api_url() -> String {
        "http://localhost:3000/api".to_string()
    }

    fn default_chat_timeout() -> u64 {
        120
    }

    fn default_search_timeout() -> u64 {
        30
    }

    fn default_extract_timeout() -> u64 {
        60
    }

    fn default_search_result_count() -> u32 {
        10
    }

    /// Connection settings for the remote task service.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ClientSettings {
        /// Base URL, e.g. "http://localhost:3000/api" (no trailing slash needed)
        #[serde(default = "default_api_url")]
        pub api_url: String,
        #[serde(default = "default_chat_timeout")]
        pub chat_timeout_secs: u64,
        #[serde(default = "default_search_timeout")]
        pub search_timeout_secs: u64,
        #[serde(default = "default_extract_timeout")]
        pub extract_timeout_secs: u64,
        /// Value sent as `num` on every search
        #[serde(default = "default_search_result_count")]
        pub search_result_count: u32,
    }

    impl Default for ClientSettings {
        fn default() -> Self {
            Self {
                api_url: default_api_url(),
                chat_timeout_secs: default_chat_timeout(),
                search_timeout_secs: default_search_timeout(),
                extract_timeout_secs: default_extract_timeout(),
                search_result_count: default_search_result_count(),
            }
        }
    }

}
