use thiserror::Error;

pub type Result<T> = std::result::Result<T, GitweekError>;

#[derive(Error, Debug)]
pub enum GitweekError {
    #[error("Invalid date range: {0}")]
    InvalidRange(String),
    #[error("Cannot query repository history: {0}")]
    VcsUnavailable(#[from] Box<gix::discover::Error>),
    #[error("Malformed report document: {0}")]
    MalformedDocument(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Diff tree to tree error: {0}")]
    DiffTreeToTree(#[from] Box<gix::repository::diff_tree_to_tree::Error>),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::discover::Error> for GitweekError {
    fn from(err: gix::discover::Error) -> Self {
        GitweekError::VcsUnavailable(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for GitweekError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        GitweekError::HeadPeel(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for GitweekError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        GitweekError::RefFind(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for GitweekError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        GitweekError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for GitweekError {
    fn from(err: gix::object::commit::Error) -> Self {
        GitweekError::Commit(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for GitweekError {
    fn from(err: gix::objs::decode::Error) -> Self {
        GitweekError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for GitweekError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        GitweekError::DiffTreeToTree(Box::new(err))
    }
}
