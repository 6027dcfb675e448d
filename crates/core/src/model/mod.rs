mod entry;
mod ids;
mod progress;
mod question;

pub use entry::{EntryDraft, EntryError, IdiomEntry};
pub use ids::{EntryId, ParseUserIdError, UserId};
pub use progress::{CategoryProgress, ProgressSnapshot, UserProgress};
pub use question::{Direction, Mode, Question, QuestionError};
