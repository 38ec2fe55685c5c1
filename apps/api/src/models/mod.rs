pub mod checkin;
pub mod customer;
