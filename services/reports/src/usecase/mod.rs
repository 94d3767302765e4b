pub mod assignment;
pub mod compose;
pub mod dispatch;
pub mod fanout;
pub mod ingest;
pub mod normalize;
pub mod reconcile;
