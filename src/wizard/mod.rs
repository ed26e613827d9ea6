//! The application wizard: an explicit, serializable session object
//! stepped through Personal -> Education -> Projects -> Confirmation,
//! flushing the full form snapshot to the server at every transition.

pub mod gateway;
pub mod session;

pub use gateway::{DraftGateway, GatewayError, HttpGateway};
pub use session::{FormSession, Step, StepOutcome, SubmitOutcome};
