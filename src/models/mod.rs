pub mod delivery_person;
pub mod parcel;
pub mod status;
