pub mod mailer;
pub mod report;
pub mod storage;
