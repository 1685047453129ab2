//! Text rendering of API records

use agendify_core::format::{format_cep, format_date, format_date_time, full_name, truncate};
use agendify_core::{Appointment, AppointmentStats, Log, Pagination, User};
use agendify_frontend_common::DataTable;
use agendify_http::types::Address;
use std::fmt::Write;

const DESCRIPTION_WIDTH: usize = 60;

fn render<T>(table: DataTable<'_, T>, cards: bool) -> String {
    if cards {
        table.render_cards()
    } else {
        table.render()
    }
}

pub fn appointments(rows: &[Appointment], pagination: Option<Pagination>, cards: bool) -> String {
    let table = DataTable::new(
        &["ID", "Date", "Time", "Room", "Status", "Client"],
        rows,
        |a: &Appointment| {
            vec![
                a.id.clone(),
                format_date(&a.date),
                a.time.clone(),
                a.room.clone(),
                a.status.label().to_string(),
                a.user
                    .as_ref()
                    .map(|u| full_name(&u.name, &u.surname))
                    .unwrap_or_else(|| "-".to_string()),
            ]
        },
    )
    .with_pagination(pagination);
    render(table, cards)
}

pub fn clients(rows: &[User], pagination: Option<Pagination>, cards: bool) -> String {
    let table = DataTable::new(
        &["ID", "Name", "Email", "Status", "Appointments", "Logs", "Since"],
        rows,
        |u: &User| {
            vec![
                u.id.clone(),
                full_name(&u.name, &u.surname),
                u.email.clone(),
                if u.is_active { "Active" } else { "Inactive" }.to_string(),
                yes_no(u.permissions.appointments),
                yes_no(u.permissions.logs),
                format_date(u.created_at.as_deref().unwrap_or_default()),
            ]
        },
    )
    .with_pagination(pagination);
    render(table, cards)
}

pub fn logs(rows: &[Log], pagination: Option<Pagination>, cards: bool) -> String {
    let table = DataTable::new(
        &["When", "User", "Role", "Entity", "Description"],
        rows,
        |l: &Log| {
            vec![
                format_date_time(&l.created_at),
                full_name(&l.user.name, &l.user.surname),
                l.user.role.clone(),
                l.entity.clone(),
                truncate(&l.description, DESCRIPTION_WIDTH),
            ]
        },
    )
    .with_pagination(pagination);
    render(table, cards)
}

pub fn stats(stats: &AppointmentStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total:        {}", stats.total);
    let _ = writeln!(out, "Under review: {}", stats.by_status.analise);
    let _ = writeln!(out, "Scheduled:    {}", stats.by_status.agendado);
    let _ = writeln!(out, "Cancelled:    {}", stats.by_status.cancelado);
    let _ = writeln!(out, "Upcoming:     {}", stats.upcoming_appointments);
    if !stats.by_room.is_empty() {
        out.push_str("\nBy room:\n");
        for room in &stats.by_room {
            let _ = writeln!(out, "  {:<10} {}", room.room, room.count);
        }
    }
    out
}

pub fn profile(user: &User) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Name:    {}", full_name(&user.name, &user.surname));
    let _ = writeln!(out, "Email:   {}", user.email);
    let _ = writeln!(out, "Role:    {}", user.role);
    if let Some(cep) = &user.cep {
        let _ = writeln!(out, "CEP:     {}", format_cep(cep));
    }
    let street = [user.address.as_deref(), user.number.as_deref(), user.complement.as_deref()]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    if !street.is_empty() {
        let _ = writeln!(out, "Address: {street}");
    }
    let place = [user.neighborhood.as_deref(), user.city.as_deref(), user.state.as_deref()]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" - ");
    if !place.is_empty() {
        let _ = writeln!(out, "         {place}");
    }
    out
}

pub fn address(cep: &str, address: &Address) -> String {
    format!(
        "CEP:          {}\nStreet:       {}\nNeighborhood: {}\nCity:         {}/{}\n",
        format_cep(cep),
        address.address,
        address.neighborhood,
        address.city,
        address.state
    )
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use agendify_core::AppointmentStatus;
    use agendify_core::types::UserSummary;

    fn booking() -> Appointment {
        Appointment {
            id: "a1".into(),
            date: "2026-03-02".into(),
            time: "09:00".into(),
            room: "Sala 012".into(),
            status: AppointmentStatus::Scheduled,
            user_id: "u1".into(),
            created_at: None,
            updated_at: None,
            user: Some(UserSummary {
                id: None,
                name: "Ana".into(),
                surname: "Silva".into(),
                email: None,
            }),
        }
    }

    #[test]
    fn test_appointments_table() {
        let out = appointments(&[booking()], None, false);
        let row = out.lines().nth(2).unwrap();
        assert!(row.contains("02/03/2026"));
        assert!(row.contains("Scheduled"));
        assert!(row.ends_with("Ana Silva"));
    }

    #[test]
    fn test_empty_list() {
        let out = logs(&[], Some(Pagination::default()), false);
        assert!(out.contains("No records found."));
        assert!(out.contains("Page 1 of 1 · 0 records"));
    }

    #[test]
    fn test_address() {
        let out = address(
            "01310100",
            &Address {
                address: "Avenida Paulista".into(),
                neighborhood: "Bela Vista".into(),
                city: "São Paulo".into(),
                state: "SP".into(),
            },
        );
        assert!(out.starts_with("CEP:          01310-100\n"));
        assert!(out.contains("São Paulo/SP"));
    }
}
