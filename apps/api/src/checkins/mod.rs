// Daily check-ins: at most one per customer per civil day, enforced by the
// (customer_id, checkin_date) unique constraint.

pub mod handlers;
pub mod repository;
