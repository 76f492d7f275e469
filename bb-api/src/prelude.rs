pub use crate::auth::Credentials;
pub use crate::bwfilter::BWFilter;
pub use crate::config::ClientConfig;
pub use crate::error::{ApiError, FilterError};
pub use crate::extended::CourseFetch;
pub use crate::filters::{AttachmentFilter, MembershipFilter};
pub use crate::session::{BlackboardSession, Route};
