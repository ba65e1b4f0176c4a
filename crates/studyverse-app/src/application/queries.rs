mod activity_queries;

pub use activity_queries::ActivityQueries;
