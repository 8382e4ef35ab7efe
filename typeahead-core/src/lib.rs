pub mod error;

pub mod config;

pub mod controller {
    pub mod search_controller;
    pub use search_controller::SearchController;
}

pub mod model {
    pub mod input;
    pub use input::TextInput;

    pub mod search_state;
    pub use search_state::{Effect, Generation, Phase, SearchEvent, SearchState};
}

pub mod search {
    pub mod client;
    pub use client::{HttpSearchClient, SearchBackend};

    pub mod response;
    pub use response::{SearchDoc, SearchHits, SearchResponse};
}

pub mod view {
    pub mod theme;

    pub mod ui;

    pub mod components {
        pub mod results_list;
        pub use results_list::ResultsList;
        pub mod search_input;
        pub use search_input::SearchInputField;
        pub mod status_line;
        pub use status_line::StatusLine;
    }

    pub use components::*;
}

pub mod util {
    pub mod debounce;
}

pub mod logging;
pub use logging::Logger;

pub use error::AppError;

pub use config::Config;
