use crate::error::AppError;

pub mod incidents;
pub mod location;

pub use incidents::IncidentService;
pub use location::LocationService;

pub(crate) fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), AppError> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::InvalidCoordinates);
    }
    Ok(())
}

pub(crate) fn validate_radius(radius: f64) -> Result<(), AppError> {
    if radius <= 0.0 {
        return Err(AppError::InvalidRadius);
    }
    Ok(())
}
