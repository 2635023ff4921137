use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{DeskError, DeskResult};
use crate::models::{check_amount, new_id, DateKey, Reservation, ReservationOptions, ReservationStatus, YearMonth};

/// Rooms of the pension, in display order.
pub const ROOMS: [&str; 3] = ["산수유", "소나무", "대나무"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StayOption {
    Jacuzzi,
    Charcoal,
    ExtraPerson,
    Pet,
}

impl FromStr for StayOption {
    type Err = DeskError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jacuzzi" => Ok(StayOption::Jacuzzi),
            "charcoal" => Ok(StayOption::Charcoal),
            "extra-person" => Ok(StayOption::ExtraPerson),
            "pet" => Ok(StayOption::Pet),
            _ => Err(DeskError::validation(format!(
                "unknown add-on '{}' (jacuzzi, charcoal, extra-person, pet)",
                s
            ))),
        }
    }
}

impl ReservationOptions {
    /// Moves one add-on count by `delta`, never below zero.
    pub fn adjust(&mut self, option: StayOption, delta: i32) {
        let slot = match option {
            StayOption::Jacuzzi => &mut self.jacuzzi,
            StayOption::Charcoal => &mut self.charcoal,
            StayOption::ExtraPerson => &mut self.extra_person,
            StayOption::Pet => &mut self.pet,
        };
        *slot = (*slot as i64 + delta as i64).max(0) as u32;
    }

    /// Korean labels of the add-ons booked, e.g. `자쿠지, 숯불`.
    pub fn summary(&self) -> String {
        let parts: Vec<&str> = [
            (self.jacuzzi, "자쿠지"),
            (self.charcoal, "숯불"),
            (self.extra_person, "추가인원"),
            (self.pet, "반려견"),
        ]
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(_, label)| *label)
        .collect();
        if parts.is_empty() {
            "없음".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Input for a new booking.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub room_name: String,
    pub guest_name: String,
    pub check_in: DateKey,
    pub check_out: Option<DateKey>,
    pub guest_count: u32,
    pub total_price: u64,
    pub options: ReservationOptions,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ReservationBook {
    #[serde(default)]
    pub reservations: Vec<Reservation>,
}

impl ReservationBook {
    pub fn new(reservations: Vec<Reservation>) -> ReservationBook {
        ReservationBook { reservations }
    }

    pub fn add_reservation(&mut self, new: NewReservation) -> DeskResult<&Reservation> {
        let guest = new.guest_name.trim();
        if guest.is_empty() {
            return Err(DeskError::validation("guest name must not be empty"));
        }
        if new.room_name.trim().is_empty() {
            return Err(DeskError::validation("room name must not be empty"));
        }
        if new.guest_count == 0 {
            return Err(DeskError::validation("guest count must be at least 1"));
        }
        check_amount(new.total_price, "total price")?;
        let check_out = new.check_out.unwrap_or_else(|| new.check_in.clone());
        if check_out < new.check_in {
            return Err(DeskError::validation("check-out must not be before check-in"));
        }
        let res = Reservation {
            id: new_id(),
            room_name: new.room_name.trim().to_string(),
            guest_name: guest.to_string(),
            check_in: new.check_in,
            check_out,
            status: ReservationStatus::Confirmed,
            total_price: new.total_price,
            guest_count: new.guest_count,
            options: new.options,
        };
        info!(id = %res.id, room = %res.room_name, check_in = %res.check_in, "reservation added");
        self.reservations.push(res);
        Ok(&self.reservations[self.reservations.len() - 1])
    }

    pub fn set_status(&mut self, id: &str, status: ReservationStatus) -> DeskResult<&Reservation> {
        let res = self
            .reservations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DeskError::not_found("Reservation", id))?;
        res.status = status;
        info!(id, status = %status, "reservation status changed");
        Ok(res)
    }

    /// Books more or fewer of one add-on on an existing stay.
    pub fn adjust_option(&mut self, id: &str, option: StayOption, delta: i32) -> DeskResult<ReservationOptions> {
        let res = self
            .reservations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DeskError::not_found("Reservation", id))?;
        res.options.adjust(option, delta);
        info!(id, options = %res.options.summary(), "reservation add-ons changed");
        Ok(res.options)
    }

    /// Reservations checking in on `date`.
    pub fn on_day(&self, date: &DateKey) -> Vec<&Reservation> {
        self.reservations.iter().filter(|r| r.check_in == *date).collect()
    }

    pub fn in_month(&self, month: YearMonth) -> Vec<&Reservation> {
        let mut list: Vec<&Reservation> = self
            .reservations
            .iter()
            .filter(|r| month.contains(&r.check_in))
            .collect();
        list.sort_by(|a, b| a.check_in.cmp(&b.check_in).then_with(|| a.room_name.cmp(&b.room_name)));
        list
    }

    pub fn confirmed_in(&self, month: YearMonth) -> Vec<&Reservation> {
        self.in_month(month)
            .into_iter()
            .filter(|r| r.status == ReservationStatus::Confirmed)
            .collect()
    }
}
