pub mod query;
pub mod record;

pub use query::{QueryErrorBody, QueryRequest, UserData, UsersData};
pub use record::{generate_directory, username_for, UserRecord, PAGE_SIZE, USER_COUNT};
