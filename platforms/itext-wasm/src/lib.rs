use wasm_bindgen::prelude::*;
use itext_feed::{decode_feed, decode_passage_response};
use itext_index::query_path;
use itext_protocol::PassageQuery;
use itext_reader::{render_rows, LoadTicket, Page, PageConfig, PageError, RenderUpdate, RowOptions, UiEvent};
use serde::Serialize;

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

/// The reader page running in the browser.
///
/// JavaScript performs the fetches (feed URL and passage path come from
/// here), hands the response bodies back, and draws the returned
/// `RenderUpdate` list.
#[wasm_bindgen]
pub struct ReaderEngine {
    page: Page,
}

#[wasm_bindgen]
impl ReaderEngine {
    /// `config` is a JSON `PageConfig`: `{"passage": "...", "feed": {"key": "...", "worksheet": 1}}`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: &str) -> Result<ReaderEngine, JsValue> {
        let config = PageConfig::from_json(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            page: Page::new(config),
        })
    }

    pub fn feed_url(&self) -> String {
        self.page.config().feed.url()
    }

    /// Endpoint path of the target passage, or `undefined` if the passage string is incomplete.
    pub fn passage_path(&self) -> Option<String> {
        self.page.passage_query().map(|q| query_path(&q))
    }

    pub fn begin_feed_load(&mut self) -> u64 {
        self.page.begin_feed_load().raw()
    }

    pub fn begin_passage_load(&mut self) -> u64 {
        self.page.begin_passage_load().raw()
    }

    /// Feed body arrived. Returns the updates to draw (source list, and badges if a passage is shown).
    pub fn feed_loaded(&mut self, ticket: u64, body: &str) -> Result<JsValue, JsValue> {
        let updates = match decode_feed(body) {
            Ok(itexts) => self.page.load_feed(LoadTicket::from_raw(ticket), itexts),
            Err(err) => vec![self.page.fail(&PageError::from(err))],
        };
        to_js(&updates)
    }

    /// Passage body arrived. Call only after `feed_loaded`.
    pub fn passage_loaded(&mut self, ticket: u64, body: &str) -> Result<JsValue, JsValue> {
        let result = decode_passage_response(body)
            .map_err(PageError::from)
            .and_then(|units| self.page.load_passage(LoadTicket::from_raw(ticket), units));
        let updates = self.or_error(result);
        to_js(&updates)
    }

    /// A fetch failed on the JavaScript side.
    pub fn load_failed(&mut self, message: &str) -> Result<JsValue, JsValue> {
        let update = self.page.fail(&PageError::Fetch(message.to_string()));
        to_js(&vec![update])
    }

    /// Handles a `{type: "locusBadgeClicked", locus}` style event.
    pub fn dispatch(&mut self, event: JsValue) -> Result<JsValue, JsValue> {
        let event: UiEvent = serde_wasm_bindgen::from_value(event)?;
        let result = self.page.handle(event);
        let updates = self.or_error(result);
        to_js(&updates)
    }

    /// Rows for a source passage opened from an annotation.
    pub fn source_rows(&self, body: &str) -> Result<JsValue, JsValue> {
        let units = decode_passage_response(body).map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&render_rows(&units, RowOptions::default(), self.page.config().separator))
    }

    /// Endpoint path for any passage, e.g. the source of an annotation.
    pub fn query_path(name: &str, first: &str, last: &str) -> String {
        query_path(&PassageQuery {
            name: name.to_string(),
            first: first.to_string(),
            last: last.to_string(),
        })
    }
}

impl ReaderEngine {
    fn or_error(&mut self, result: Result<Vec<RenderUpdate>, PageError>) -> Vec<RenderUpdate> {
        match result {
            Ok(updates) => updates,
            Err(err) => vec![self.page.fail(&err)],
        }
    }
}
