//! Invoices, with a scoped list per booking at
//! `/api/invoice/booking/<booking id>`. Updates and deletions take the
//! booking the invoice currently belongs to, so that booking's list is
//! refetched even when the write body doesn't mention it.

use payloads::endpoints::INVOICE;
use payloads::requests::InvoiceFields;
use payloads::{BookingId, Invoice, InvoiceId, InvoiceStatus};
use serde_json::Value;

use super::Resource;
use crate::cache::CacheKey;
use crate::hooks::{
    DetailHook, ListHook, MutationDef, MutationHook, Normalize, WriteRequest,
    use_detail, use_list, use_mutation,
};
use crate::{DataContext, MutationError};

pub const INVOICES: Resource = Resource::new(INVOICE, "invoice");

const BOOKING_SCOPE: &str = "booking";

pub fn list_key() -> CacheKey {
    INVOICES.list_key()
}

pub fn detail_key(id: &InvoiceId) -> Option<CacheKey> {
    INVOICES.detail_key(id.as_str())
}

/// `/api/invoice/booking/<id>`, or `None` for a blank id.
pub fn by_booking_key(booking_id: &BookingId) -> Option<CacheKey> {
    CacheKey::scoped(&INVOICE, BOOKING_SCOPE, booking_id.as_str())
}

impl Normalize for Invoice {
    fn normalize(self) -> Self {
        Self {
            status: self.status.or(Some(InvoiceStatus::Unpaid)),
            ..self
        }
    }
}

pub fn use_invoices(ctx: &DataContext) -> ListHook<Invoice> {
    use_list(ctx, list_key())
}

pub fn use_invoice(
    ctx: &DataContext,
    id: Option<&InvoiceId>,
) -> DetailHook<Invoice> {
    use_detail(ctx, id.and_then(detail_key))
}

/// Invoices issued for one booking.
pub fn use_booking_invoices(
    ctx: &DataContext,
    booking_id: Option<&BookingId>,
) -> ListHook<Invoice> {
    use_list(ctx, booking_id.and_then(by_booking_key))
}

pub fn use_create_invoice(
    ctx: &DataContext,
) -> MutationHook<InvoiceFields, Invoice> {
    let def = INVOICES.create().also_invalidates(|fields: &InvoiceFields| {
        fields
            .booking_id
            .as_ref()
            .and_then(by_booking_key)
            .into_iter()
            .collect()
    });
    use_mutation(ctx, def)
}

/// Input of an invoice update.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceUpdate {
    pub invoice_id: InvoiceId,
    pub fields: InvoiceFields,
    /// The booking the invoice belongs to when the update is sent. Moving
    /// it to another booking goes in `fields`.
    pub booking_id: Option<BookingId>,
}

/// Input of an invoice deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDelete {
    pub invoice_id: InvoiceId,
    pub booking_id: Option<BookingId>,
}

fn booking_keys<'a>(
    ids: impl IntoIterator<Item = Option<&'a BookingId>>,
) -> Vec<CacheKey> {
    let mut keys: Vec<CacheKey> =
        ids.into_iter().flatten().filter_map(by_booking_key).collect();
    keys.dedup();
    keys
}

fn require_id(id: &InvoiceId) -> Result<&str, MutationError> {
    if id.is_blank() {
        return Err(MutationError::InvalidInput("invoice id is required".into()));
    }
    Ok(id.as_str())
}

pub fn update_invoice_def() -> MutationDef<InvoiceUpdate, Invoice> {
    MutationDef::new("update invoice", |update: &InvoiceUpdate| {
        let id = require_id(&update.invoice_id)?;
        WriteRequest::put(INVOICE.detail_path(id), &update.fields)
    })
    .invalidates(|update: &InvoiceUpdate| {
        let mut keys = INVOICES.record_keys(update.invoice_id.as_str());
        keys.extend(booking_keys([
            update.booking_id.as_ref(),
            update.fields.booking_id.as_ref(),
        ]));
        keys
    })
    .messages("Invoice updated", "Could not update invoice")
}

pub fn use_update_invoice(
    ctx: &DataContext,
) -> MutationHook<InvoiceUpdate, Invoice> {
    use_mutation(ctx, update_invoice_def())
}

pub fn delete_invoice_def() -> MutationDef<InvoiceDelete, Value> {
    MutationDef::new("delete invoice", |delete: &InvoiceDelete| {
        let id = require_id(&delete.invoice_id)?;
        Ok(WriteRequest::delete(INVOICE.detail_path(id)))
    })
    .invalidates(|delete: &InvoiceDelete| {
        let mut keys = INVOICES.record_keys(delete.invoice_id.as_str());
        keys.extend(booking_keys([delete.booking_id.as_ref()]));
        keys
    })
    .messages("Invoice deleted", "Could not delete invoice")
}

pub fn use_delete_invoice(
    ctx: &DataContext,
) -> MutationHook<InvoiceDelete, Value> {
    use_mutation(ctx, delete_invoice_def())
}
