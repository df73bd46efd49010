//! Hotel, assignment and employee management commands.
//!
//! Writes go through the same repositories and services as the API, so
//! the duplicate and missing-hotel checks match.

use chrono::Utc;

use otelier_api::db::{self, Repositories};
use otelier_api::models::{Employee, NewHotel};
use otelier_api::services::{AccessPolicy, AuthorizationService};
use otelier_core::{HotelId, HotelRole, UserId};

use super::{CommandError, database_url};

async fn connect() -> Result<Repositories, CommandError> {
    let url = database_url()?;
    tracing::info!("Connecting to database...");
    Ok(Repositories::postgres(db::create_pool(&url).await?))
}

fn parse_user(value: &str) -> Result<UserId, CommandError> {
    UserId::parse(value).ok_or_else(|| CommandError::InvalidArgument("user", "cannot be blank".to_string()))
}

fn parse_hotel(value: &str) -> Result<HotelId, CommandError> {
    value
        .parse()
        .map_err(|e: uuid::Error| CommandError::InvalidArgument("hotel ID", e.to_string()))
}

/// Create a hotel and return its ID.
pub async fn create_hotel(name: &str, address: &str) -> Result<HotelId, CommandError> {
    let hotel = NewHotel::new(name, address)
        .ok_or_else(|| CommandError::InvalidArgument("name", "cannot be blank".to_string()))?
        .into_hotel(Utc::now());

    let repos = connect().await?;
    repos.hotels.insert(&hotel).await?;

    tracing::info!("Hotel created! ID: {}, Name: {}", hotel.id, hotel.name);

    #[allow(clippy::print_stdout)]
    {
        println!("{}", hotel.id);
    }
    Ok(hotel.id)
}

/// Assign a user to a hotel with a role.
pub async fn assign_user(user: &str, hotel: &str, role: &str, by: &str) -> Result<(), CommandError> {
    let user_id = parse_user(user)?;
    let hotel_id = parse_hotel(hotel)?;
    let role: HotelRole = role
        .parse()
        .map_err(|e| CommandError::InvalidArgument("role", e))?;
    let assigned_by = parse_user(by)?;

    let repos = connect().await?;
    let assignment = AuthorizationService::new(repos, AccessPolicy::Assignment)
        .assign_user(&assigned_by, user_id, hotel_id, role)
        .await?;

    tracing::info!(
        "Assignment created! ID: {}, User: {}, Hotel: {}, Role: {}",
        assignment.id,
        assignment.user_id,
        assignment.hotel_id,
        assignment.role
    );
    Ok(())
}

/// Bind a user to one hotel for the employee access policy.
pub async fn add_employee(user: &str, hotel: &str) -> Result<(), CommandError> {
    let employee = Employee {
        id: parse_user(user)?,
        hotel_id: parse_hotel(hotel)?,
    };

    let repos = connect().await?;
    repos.employees.insert(&employee).await?;

    tracing::info!("Employee added! User: {}, Hotel: {}", employee.id, employee.hotel_id);
    Ok(())
}
