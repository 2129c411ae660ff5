pub mod repository;
pub mod service;
pub mod repo {
    pub mod seaorm;
}
