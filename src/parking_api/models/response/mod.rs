pub mod parking_response;
