//! Domain models for guest check-ins.

pub mod checkin;

pub use checkin::{
    ArrivalsQuery, CheckinRecord, CheckinValidationError, FieldViolation, GuestCheckinView,
    ListCheckinsResponse, NewCheckin, SetLockAccessRequest, StaffCheckinView,
};
