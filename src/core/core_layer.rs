// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "dates/date_service.rs"]
pub mod dates;

#[path = "ledger/mod.rs"]
pub mod ledger;

#[path = "replies/reply_formatter.rs"]
pub mod replies;

#[path = "slots/slot_normalizer.rs"]
pub mod slots;
