pub mod comment;
pub mod post;
pub mod user;

pub use comment::{Comment, CommentView};
pub use post::{Post, PostDetail, PostSummary};
pub use user::{Profile, PublicUser, User};
