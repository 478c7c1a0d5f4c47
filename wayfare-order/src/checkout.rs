use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;
use wayfare_catalog::{PriceBreakdown, PricingEngine, QuoteRequest};
use wayfare_core::payment::{GatewayOrder, PaymentRecord};
use wayfare_core::repository::PaymentRecordRepository;
use wayfare_core::CoreError;

use crate::error::CheckoutError;
use crate::issuer::OrderIssuer;
use crate::materializer::Materialized;
use crate::verification::{PaymentConfirmation, VerificationGate};

/// A priced quote with the gateway order opened for it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedQuote {
    pub total_price: f64,
    pub breakdown: PriceBreakdown,
    pub order: GatewayOrder,
}

/// Quote, order and verify in one place: the only path by which a price
/// reaches a booking.
pub struct CheckoutService {
    pricing: PricingEngine,
    issuer: OrderIssuer,
    payments: Arc<dyn PaymentRecordRepository>,
    gate: VerificationGate,
}

impl CheckoutService {
    pub fn new(
        pricing: PricingEngine,
        issuer: OrderIssuer,
        payments: Arc<dyn PaymentRecordRepository>,
        gate: VerificationGate,
    ) -> Self {
        Self {
            pricing,
            issuer,
            payments,
            gate,
        }
    }

    /// Price the request, open a gateway order for the total and record the
    /// price against the order id.
    ///
    /// Nothing is recorded when pricing or the gateway fails.
    pub async fn quote_and_order(
        &self,
        user_id: Uuid,
        request: &QuoteRequest,
    ) -> Result<IssuedQuote, CheckoutError> {
        if request.guest_count == 0 {
            return Err(CoreError::ValidationError("guestCount must be at least 1".to_string()).into());
        }

        let breakdown = self.pricing.compute_total(request).await?;
        let total = breakdown.total;
        if !total.is_finite() || total <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Computed total {} cannot be charged",
                total
            ))
            .into());
        }

        let order = self.issuer.create_order(total).await?;

        let record = PaymentRecord::pending(order.id.clone(), user_id, request.package_id, total);
        if let Err(e) = self.payments.create_record(&record).await {
            error!(order_id = %order.id, "Gateway order issued but payment record not saved: {}", e);
            return Err(CheckoutError::repository(e));
        }

        info!(
            order_id = %order.id,
            package_id = %request.package_id,
            user_id = %user_id,
            total,
            "Quote issued"
        );

        Ok(IssuedQuote {
            total_price: total,
            breakdown,
            order,
        })
    }

    pub async fn verify_payment(
        &self,
        confirmation: PaymentConfirmation,
    ) -> Result<Materialized, CheckoutError> {
        self.gate.verify(confirmation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{checkout, draft, seeded, MockGateway, SECRET};
    use wayfare_catalog::{HotelSelection, PricingError, Services};
    use wayfare_core::payment::PaymentRecordStatus;
    use wayfare_core::signature::expected_signature;

    fn request(package_id: Uuid) -> QuoteRequest {
        QuoteRequest {
            package_id,
            guest_count: 2,
            hotel_selections: vec![],
            coupon_id: None,
            selected_base_price: None,
            services: Services::default(),
        }
    }

    #[tokio::test]
    async fn test_quote_records_price_for_order() {
        let fixture = seeded();
        let gateway = Arc::new(MockGateway::default());
        let service = checkout(fixture.store.clone(), gateway.clone());

        let mut req = request(fixture.package_id);
        req.selected_base_price = Some(1800.0);
        req.services.extra_bed = true;
        req.hotel_selections.push(HotelSelection {
            hotel_id: Some(fixture.hotel_id),
            adults: 1,
            children: 0,
            rooms: 1,
            extra_bed: false,
        });
        req.coupon_id = Some(fixture.coupon_id);

        let quote = service.quote_and_order(fixture.user_id, &req).await.unwrap();

        // 1800 * 2 + 200 + 500 = 4300, 10% capped at 300 -> 4000
        assert_eq!(quote.total_price, 4000.0);
        assert_eq!(quote.order.amount, 400_000);
        assert_eq!(gateway.requests()[0].amount, 400_000);

        let record = fixture.store.record(&quote.order.id).unwrap();
        assert_eq!(record.verified_price, Some(4000.0));
        assert_eq!(record.status, PaymentRecordStatus::Pending);
        assert_eq!(record.user_id, fixture.user_id);
    }

    #[tokio::test]
    async fn test_gateway_failure_writes_no_record() {
        let fixture = seeded();
        let service = checkout(fixture.store.clone(), Arc::new(MockGateway::failing()));

        let err = service
            .quote_and_order(fixture.user_id, &request(fixture.package_id))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Gateway(_)));
        assert!(fixture.store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pricing_failure_skips_gateway() {
        let fixture = seeded();
        let gateway = Arc::new(MockGateway::default());
        let service = checkout(fixture.store.clone(), gateway.clone());

        let mut req = request(fixture.package_id);
        req.selected_base_price = Some(1799.0);
        let err = service.quote_and_order(fixture.user_id, &req).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Pricing(PricingError::InvalidSelection(_))));

        let err = service
            .quote_and_order(fixture.user_id, &request(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Pricing(PricingError::NotFound(_))));

        assert!(gateway.requests().is_empty());
    }

    #[tokio::test]
    async fn test_zero_guests_rejected() {
        let fixture = seeded();
        let gateway = Arc::new(MockGateway::default());
        let service = checkout(fixture.store.clone(), gateway.clone());

        let mut req = request(fixture.package_id);
        req.guest_count = 0;
        let err = service.quote_and_order(fixture.user_id, &req).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Core(CoreError::ValidationError(_))));
        assert!(gateway.requests().is_empty());
    }

    #[tokio::test]
    async fn test_client_price_never_reaches_booking() {
        let fixture = seeded();
        let service = checkout(fixture.store.clone(), Arc::new(MockGateway::default()));

        let quote = service
            .quote_and_order(fixture.user_id, &request(fixture.package_id))
            .await
            .unwrap();
        assert_eq!(quote.total_price, 2000.0);

        // The draft carries packageBookedPrice = 1, which is dropped.
        let signature = expected_signature(SECRET, &quote.order.id, "pay_1").unwrap();
        let outcome = service
            .verify_payment(PaymentConfirmation {
                order_id: quote.order.id.clone(),
                payment_id: "pay_1".to_string(),
                signature,
                user_id: fixture.user_id,
                booking: draft(fixture.package_id),
            })
            .await
            .unwrap();

        assert_eq!(outcome.booking.package_booked_price, 2000.0);
        assert_eq!(
            fixture.store.record(&quote.order.id).unwrap().status,
            PaymentRecordStatus::Paid
        );
    }
}
