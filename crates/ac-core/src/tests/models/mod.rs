mod membership;
mod membership_requests;
mod membership_status;
mod role;
