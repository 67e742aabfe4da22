//! Columns and forms for each child record type

use crate::components::record_panel::{parse_trip_choice, PanelContext, PanelRecord};
use crate::components::table::money;
use crate::model::entity::EntityId;
use crate::model::form::{format_date, Form};
use crate::model::records::{
    Cost, CostPatch, FuelLog, FuelLogPatch, MaintenancePatch, MaintenanceRecord,
    MaintenanceStatus, NewCost, NewFuelLog, NewMaintenanceRecord, NewTrip, NewVoyage,
    RecordDraft, RecordKind, RecordPatch, Trip, TripPatch, Voyage, VoyagePatch, FUEL_TYPES,
    UNCATEGORIZED,
};

fn optional_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(format_date).unwrap_or_else(|| "—".to_string())
}

// ─── Trips ───────────────────────────────────────────────────────────────────

impl PanelRecord for Trip {
    const KIND: RecordKind = RecordKind::Trip;
    const TITLE: &'static str = "Trips";

    fn headers() -> &'static [&'static str] {
        &["#", "Name", "Origin", "Destination", "Start", "End"]
    }

    fn cells(&self, _ctx: &PanelContext) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.origin.clone(),
            self.destination.clone(),
            format_date(self.start_date),
            optional_date(self.end_date),
        ]
    }

    fn label(&self) -> String {
        format!("trip \"{}\"", Trip::label(self))
    }

    fn new_form(ctx: &PanelContext) -> Form {
        Form::new("New trip")
            .text("name", "Name", "")
            .text("origin", "Origin", "")
            .text("destination", "Destination", "")
            .date("start", "Start date", ctx.today)
            .optional_date("end", "End date", None)
            .text("notes", "Notes", "")
    }

    fn edit_form(&self, _ctx: &PanelContext) -> Form {
        Form::new(format!("Edit trip #{}", self.id))
            .text("name", "Name", &self.name)
            .text("origin", "Origin", &self.origin)
            .text("destination", "Destination", &self.destination)
            .date("start", "Start date", self.start_date)
            .optional_date("end", "End date", self.end_date)
            .text("notes", "Notes", &self.notes)
    }

    fn draft(form: &Form, ship_id: EntityId, ctx: &PanelContext) -> RecordDraft {
        RecordDraft::Trip(NewTrip {
            ship_id,
            name: form.string("name"),
            origin: form.string("origin"),
            destination: form.string("destination"),
            start_date: form.get_date("start", ctx.today),
            end_date: form.get_optional_date("end", ctx.today),
            notes: form.string("notes"),
        })
    }

    fn patch(form: &Form, id: EntityId, ctx: &PanelContext) -> RecordPatch {
        RecordPatch::Trip(
            id,
            TripPatch {
                name: Some(form.string("name")),
                origin: Some(form.string("origin")),
                destination: Some(form.string("destination")),
                start_date: Some(form.get_date("start", ctx.today)),
                end_date: Some(form.get_optional_date("end", ctx.today)),
                notes: Some(form.string("notes")),
            },
        )
    }
}

// ─── Voyages ─────────────────────────────────────────────────────────────────

impl PanelRecord for Voyage {
    const KIND: RecordKind = RecordKind::Voyage;
    const TITLE: &'static str = "Voyages";

    fn headers() -> &'static [&'static str] {
        &["From", "To", "Departed", "Arrived", "Cargo", "Distance (nm)", "Trip"]
    }

    fn cells(&self, ctx: &PanelContext) -> Vec<String> {
        vec![
            self.departure_port.clone(),
            self.arrival_port.clone(),
            format_date(self.departure_date),
            optional_date(self.arrival_date),
            self.cargo.clone(),
            format!("{:.0}", self.distance_nm),
            ctx.trip_label(self.trip_id),
        ]
    }

    fn label(&self) -> String {
        format!("voyage {} → {}", self.departure_port, self.arrival_port)
    }

    fn new_form(ctx: &PanelContext) -> Form {
        Form::new("New voyage")
            .choice("trip", "Trip", ctx.trip_options(), "")
            .text("from", "Departure port", "")
            .text("to", "Arrival port", "")
            .date("departed", "Departure date", ctx.today)
            .optional_date("arrived", "Arrival date", None)
            .text("cargo", "Cargo", "")
            .decimal("distance", "Distance (nm)", 0.0)
    }

    fn edit_form(&self, ctx: &PanelContext) -> Form {
        Form::new("Edit voyage")
            .choice("trip", "Trip", ctx.trip_options(), &ctx.trip_choice(self.trip_id))
            .text("from", "Departure port", &self.departure_port)
            .text("to", "Arrival port", &self.arrival_port)
            .date("departed", "Departure date", self.departure_date)
            .optional_date("arrived", "Arrival date", self.arrival_date)
            .text("cargo", "Cargo", &self.cargo)
            .decimal("distance", "Distance (nm)", self.distance_nm)
    }

    fn draft(form: &Form, ship_id: EntityId, ctx: &PanelContext) -> RecordDraft {
        RecordDraft::Voyage(NewVoyage {
            ship_id,
            trip_id: parse_trip_choice(form.get_choice("trip")),
            departure_port: form.string("from"),
            arrival_port: form.string("to"),
            departure_date: form.get_date("departed", ctx.today),
            arrival_date: form.get_optional_date("arrived", ctx.today),
            cargo: form.string("cargo"),
            distance_nm: form.get_decimal("distance"),
        })
    }

    fn patch(form: &Form, id: EntityId, ctx: &PanelContext) -> RecordPatch {
        RecordPatch::Voyage(
            id,
            VoyagePatch {
                trip_id: Some(parse_trip_choice(form.get_choice("trip"))),
                departure_port: Some(form.string("from")),
                arrival_port: Some(form.string("to")),
                departure_date: Some(form.get_date("departed", ctx.today)),
                arrival_date: Some(form.get_optional_date("arrived", ctx.today)),
                cargo: Some(form.string("cargo")),
                distance_nm: Some(form.get_decimal("distance")),
            },
        )
    }
}

// ─── Fuel logs ───────────────────────────────────────────────────────────────

fn fuel_options(current: &str) -> Vec<String> {
    let mut options: Vec<String> = FUEL_TYPES.iter().map(|f| f.to_string()).collect();
    if !current.is_empty() && !options.iter().any(|o| o == current) {
        options.push(current.to_string());
    }
    options
}

impl PanelRecord for FuelLog {
    const KIND: RecordKind = RecordKind::FuelLog;
    const TITLE: &'static str = "Fuel";

    fn headers() -> &'static [&'static str] {
        &["Date", "Type", "Qty (t)", "Unit price", "Total", "Port"]
    }

    fn cells(&self, _ctx: &PanelContext) -> Vec<String> {
        vec![
            format_date(self.date),
            self.fuel_type.clone(),
            format!("{:.1}", self.quantity_tons),
            money(self.unit_price),
            money(self.total()),
            self.port.clone(),
        ]
    }

    fn label(&self) -> String {
        format!("fuel log of {} ({} t {})", format_date(self.date), self.quantity_tons, self.fuel_type)
    }

    fn new_form(ctx: &PanelContext) -> Form {
        Form::new("New fuel log")
            .date("date", "Date", ctx.today)
            .choice("fuel", "Fuel type", fuel_options(""), FUEL_TYPES[0])
            .decimal("quantity", "Quantity (t)", 0.0)
            .decimal("price", "Unit price", 0.0)
            .text("port", "Port", "")
    }

    fn edit_form(&self, _ctx: &PanelContext) -> Form {
        Form::new("Edit fuel log")
            .date("date", "Date", self.date)
            .choice("fuel", "Fuel type", fuel_options(&self.fuel_type), &self.fuel_type)
            .decimal("quantity", "Quantity (t)", self.quantity_tons)
            .decimal("price", "Unit price", self.unit_price)
            .text("port", "Port", &self.port)
    }

    fn draft(form: &Form, ship_id: EntityId, ctx: &PanelContext) -> RecordDraft {
        RecordDraft::FuelLog(NewFuelLog {
            ship_id,
            date: form.get_date("date", ctx.today),
            fuel_type: form.string("fuel"),
            quantity_tons: form.get_decimal("quantity"),
            unit_price: form.get_decimal("price"),
            port: form.string("port"),
        })
    }

    fn patch(form: &Form, id: EntityId, ctx: &PanelContext) -> RecordPatch {
        RecordPatch::FuelLog(
            id,
            FuelLogPatch {
                date: Some(form.get_date("date", ctx.today)),
                fuel_type: Some(form.string("fuel")),
                quantity_tons: Some(form.get_decimal("quantity")),
                unit_price: Some(form.get_decimal("price")),
                port: Some(form.string("port")),
            },
        )
    }
}

// ─── Costs ───────────────────────────────────────────────────────────────────

fn category_options(ctx: &PanelContext) -> Vec<String> {
    if ctx.categories.is_empty() {
        vec![UNCATEGORIZED.to_string()]
    } else {
        ctx.categories.to_vec()
    }
}

impl PanelRecord for Cost {
    const KIND: RecordKind = RecordKind::Cost;
    const TITLE: &'static str = "Costs";

    fn headers() -> &'static [&'static str] {
        &["Date", "Category", "Description", "Amount", "Trip"]
    }

    fn cells(&self, ctx: &PanelContext) -> Vec<String> {
        vec![
            format_date(self.date),
            self.category.clone(),
            self.description.clone(),
            money(self.amount),
            ctx.trip_label(self.trip_id),
        ]
    }

    fn label(&self) -> String {
        format!("{} cost of {}", self.category, money(self.amount))
    }

    fn new_form(ctx: &PanelContext) -> Form {
        Form::new("New cost")
            .date("date", "Date", ctx.today)
            .choice("category", "Category", category_options(ctx), "")
            .text("description", "Description", "")
            .decimal("amount", "Amount", 0.0)
            .choice("trip", "Trip", ctx.trip_options(), "")
    }

    fn edit_form(&self, ctx: &PanelContext) -> Form {
        Form::new("Edit cost")
            .date("date", "Date", self.date)
            .choice("category", "Category", category_options(ctx), &self.category)
            .text("description", "Description", &self.description)
            .decimal("amount", "Amount", self.amount)
            .choice("trip", "Trip", ctx.trip_options(), &ctx.trip_choice(self.trip_id))
    }

    fn draft(form: &Form, ship_id: EntityId, ctx: &PanelContext) -> RecordDraft {
        RecordDraft::Cost(NewCost {
            ship_id,
            trip_id: parse_trip_choice(form.get_choice("trip")),
            date: form.get_date("date", ctx.today),
            category: form.string("category"),
            description: form.string("description"),
            amount: form.get_decimal("amount"),
        })
    }

    fn patch(form: &Form, id: EntityId, ctx: &PanelContext) -> RecordPatch {
        RecordPatch::Cost(
            id,
            CostPatch {
                trip_id: Some(parse_trip_choice(form.get_choice("trip"))),
                date: Some(form.get_date("date", ctx.today)),
                category: Some(form.string("category")),
                description: Some(form.string("description")),
                amount: Some(form.get_decimal("amount")),
            },
        )
    }
}

// ─── Maintenance ─────────────────────────────────────────────────────────────

fn status_options() -> Vec<String> {
    MaintenanceStatus::all()
        .iter()
        .map(|s| s.label().to_string())
        .collect()
}

fn status_from(form: &Form) -> MaintenanceStatus {
    MaintenanceStatus::from_label(form.value("status")).unwrap_or_default()
}

impl PanelRecord for MaintenanceRecord {
    const KIND: RecordKind = RecordKind::Maintenance;
    const TITLE: &'static str = "Maintenance";

    fn headers() -> &'static [&'static str] {
        &["Date", "Component", "Description", "Status", "Cost", "Performed by"]
    }

    fn cells(&self, _ctx: &PanelContext) -> Vec<String> {
        vec![
            format_date(self.date),
            self.component.clone(),
            self.description.clone(),
            self.status.label().to_string(),
            money(self.cost),
            self.performed_by.clone(),
        ]
    }

    fn label(&self) -> String {
        format!("maintenance of {} on {}", self.component, format_date(self.date))
    }

    fn new_form(ctx: &PanelContext) -> Form {
        Form::new("New maintenance record")
            .date("date", "Date", ctx.today)
            .text("component", "Component", "")
            .text("description", "Description", "")
            .choice("status", "Status", status_options(), MaintenanceStatus::default().label())
            .decimal("cost", "Cost", 0.0)
            .text("by", "Performed by", "")
    }

    fn edit_form(&self, _ctx: &PanelContext) -> Form {
        Form::new("Edit maintenance record")
            .date("date", "Date", self.date)
            .text("component", "Component", &self.component)
            .text("description", "Description", &self.description)
            .choice("status", "Status", status_options(), self.status.label())
            .decimal("cost", "Cost", self.cost)
            .text("by", "Performed by", &self.performed_by)
    }

    fn draft(form: &Form, ship_id: EntityId, ctx: &PanelContext) -> RecordDraft {
        RecordDraft::Maintenance(NewMaintenanceRecord {
            ship_id,
            date: form.get_date("date", ctx.today),
            component: form.string("component"),
            description: form.string("description"),
            status: status_from(form),
            cost: form.get_decimal("cost"),
            performed_by: form.string("by"),
        })
    }

    fn patch(form: &Form, id: EntityId, ctx: &PanelContext) -> RecordPatch {
        RecordPatch::Maintenance(
            id,
            MaintenancePatch {
                date: Some(form.get_date("date", ctx.today)),
                component: Some(form.string("component")),
                description: Some(form.string("description")),
                status: Some(status_from(form)),
                cost: Some(form.get_decimal("cost")),
                performed_by: Some(form.string("by")),
            },
        )
    }
}
