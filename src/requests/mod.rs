// Concrete NSK request types, one module per API area

pub mod addons;
pub mod auth;
pub mod availability;
pub mod booking;
pub mod checkin;
pub mod common;
pub mod customers;
pub mod manifests;
pub mod messages;
pub mod navigation;
pub mod organizations;
pub mod payments;
pub mod promotions;
pub mod seats;
pub mod vouchers;

pub use addons::{AddOnRequest, BaggageAddRequest, BundleAddRequest, SsrAddRequest, SsrItem};
pub use auth::{
    AuthenticationTokenRequest, MfaChallengeRequest, MfaVerifyRequest, PasswordChangeRequest,
};
pub use availability::{AvailabilitySearchRequest, LowFareSearchRequest, TripCriterion};
pub use booking::{
    BookingCancelRequest, BookingContactRequest, BookingCreateRequest, BookingPassenger,
    BookingRetrieveRequest, JourneySellKey, PassengerUpdateRequest, TripSellRequest,
};
pub use checkin::{BoardingPassRequest, BoardingPassTarget, CheckInRequest};
pub use common::{Address, BookingContact, PassengerTypeCount, PersonName, PhoneNumber};
pub use customers::CustomerCreateRequest;
pub use manifests::FlightManifestRequest;
pub use messages::MessageSendRequest;
pub use navigation::NavigationActionRequest;
pub use organizations::{
    OrganizationContact, OrganizationCreateRequest, OrganizationDiscount,
    OrganizationRestriction, OrganizationUpdateRequest,
};
pub use payments::{CardDetails, PaymentProcessRequest, RefundRequest};
pub use promotions::{PromotionCreateRequest, PromotionMarket, PromotionValidateRequest};
pub use seats::{SeatAssignment, SeatAssignmentRequest, SeatMapRequest};
pub use vouchers::{
    VoucherCreateRequest, VoucherCustomer, VoucherSearchRequest, VoucherUpdateRequest,
};
