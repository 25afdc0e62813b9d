/*!
# Hermes DevKit - test doubles for store clients and agents

- `MockStore`: in-memory store speaking the request contract, with
  failure injection and request recording
- `TestHarness`: mock store plus synthetic OS data sources in a temp
  directory, with assertions on what was written
*/

pub mod store_stub;
pub mod test_utils;

pub use store_stub::{MockStore, RecordedRequest};
pub use test_utils::{TestHarness, TestStats};
