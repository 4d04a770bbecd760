mod ids;
mod item;
mod response;
mod section;
mod snapshot;

pub use ids::{ItemId, SectionId, SessionId};
pub use item::{AnswerKey, IrtParams, Item, ItemError, Modality};
pub use response::{Response, Verdict};
pub use section::Section;
pub use snapshot::SessionSnapshot;
