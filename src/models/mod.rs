pub mod bid_requests;
pub mod bids;
pub mod companies;
pub mod contracts;
pub mod payments;
pub mod requirements;
pub mod users;
