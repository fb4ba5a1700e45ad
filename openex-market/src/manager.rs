use crate::error::RequestError;
use crate::gate::ContactGate;
use crate::models::{
    ContactCard, Decision, DecisionOutcome, NewRequest, RequestKind, RequestLedger, RequestView,
    TransactionRequest,
};
use crate::repository::RequestRepository;
use chrono::Utc;
use openex_catalog::{ListingKind, ListingRepository, ListingStatus, StockError};
use openex_core::identity::Session;
use openex_core::repository::UserRepository;
use openex_shared::events::{
    ListingSoldEvent, RequestCreatedEvent, RequestDecidedEvent,
};
use openex_shared::MarketEvent;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{error, info};
use uuid::Uuid;

/// Creates buy/exchange requests and processes seller decisions, keeping the
/// listing quantity/status invariants.
///
/// Stock is never reserved at creation time; approval re-reads the listing
/// and validates against current stock, so two over-committing requests are
/// caught when the second approval is attempted, not before.
pub struct RequestManager {
    listings: Arc<dyn ListingRepository>,
    requests: Arc<dyn RequestRepository>,
    users: Arc<dyn UserRepository>,
    events: broadcast::Sender<MarketEvent>,
    /// (buyer, listing) pairs with a pending request. Display cache only:
    /// the write-time duplicate check always goes to the request store.
    pending_pairs: RwLock<HashSet<(Uuid, Uuid)>>,
}

impl RequestManager {
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        requests: Arc<dyn RequestRepository>,
        users: Arc<dyn UserRepository>,
        events: broadcast::Sender<MarketEvent>,
    ) -> Self {
        Self {
            listings,
            requests,
            users,
            events,
            pending_pairs: RwLock::new(HashSet::new()),
        }
    }

    /// O(1) lookup for the UI: does this buyer already have a pending request
    /// against this listing, as far as the cache knows?
    pub async fn has_pending(&self, buyer_id: Uuid, listing_id: Uuid) -> bool {
        self.pending_pairs
            .read()
            .await
            .contains(&(buyer_id, listing_id))
    }

    /// Open a request against a listing. The transaction kind is derived from
    /// the listing, not chosen by the caller. If the contact gate is closed
    /// the parameters are parked on the gate and `ContactRequired` is
    /// returned; replay them after a successful contact update.
    pub async fn create_request(
        &self,
        session: &Session,
        gate: &ContactGate,
        new: NewRequest,
    ) -> Result<TransactionRequest, RequestError> {
        if new.quantity == 0 {
            return Err(RequestError::Validation(
                "quantity must be at least 1".to_string(),
            ));
        }

        if !gate.has_valid_contact().await {
            gate.defer(new).await;
            return Err(RequestError::ContactRequired);
        }

        let listing = self
            .listings
            .get_listing(new.listing_id)
            .await?
            .ok_or(RequestError::NotFound("listing"))?;

        if listing.status != ListingStatus::Approved {
            return Err(RequestError::Validation(
                "listing is not open for requests".to_string(),
            ));
        }
        if listing.seller_id == session.user_id {
            return Err(RequestError::Validation(
                "cannot request your own listing".to_string(),
            ));
        }
        if new.quantity > listing.quantity {
            return Err(RequestError::InsufficientStock {
                requested: new.quantity,
                available: listing.quantity,
            });
        }

        let kind = match listing.kind {
            ListingKind::Sell => RequestKind::Buy,
            ListingKind::Exchange => RequestKind::Exchange,
        };
        if kind == RequestKind::Buy && new.offered_listing_id.is_some() {
            return Err(RequestError::Validation(
                "an offered item only applies to exchange requests".to_string(),
            ));
        }

        // Duplicate suppression against the authoritative store, never
        // against the local cache alone.
        if self
            .requests
            .find_pending(session.user_id, listing.id)
            .await?
            .is_some()
        {
            return Err(RequestError::DuplicatePendingRequest);
        }

        let request = TransactionRequest::new(
            session.user_id,
            listing.seller_id,
            listing.id,
            kind,
            new.quantity,
            new.offered_listing_id,
        );
        self.requests.create_request(&request).await?;

        self.pending_pairs
            .write()
            .await
            .insert((request.buyer_id, request.listing_id));

        let _ = self
            .events
            .send(MarketEvent::RequestCreated(RequestCreatedEvent {
                request_id: request.id,
                listing_id: request.listing_id,
                buyer_id: request.buyer_id,
                seller_id: request.seller_id,
                quantity: request.quantity,
                timestamp: Utc::now().timestamp(),
            }));
        info!(request_id = %request.id, listing_id = %listing.id, ?kind, "transaction request created");

        Ok(request)
    }

    /// Process the seller's decision on a pending request.
    ///
    /// Approval re-reads the listing and debits stock before the request
    /// status flips, so a failed stock check leaves both entities untouched
    /// and the request still pending.
    pub async fn decide(
        &self,
        session: &Session,
        request_id: Uuid,
        decision: Decision,
    ) -> Result<DecisionOutcome, RequestError> {
        let mut request = self
            .requests
            .get_request(request_id)
            .await?
            .ok_or(RequestError::NotFound("request"))?;

        if request.seller_id != session.user_id {
            return Err(RequestError::NotAuthorized);
        }
        if !request.is_pending() {
            return Err(RequestError::AlreadyDecided(request.status));
        }

        match decision {
            Decision::Reject => {
                request.update_status(crate::models::RequestStatus::Rejected);
                self.requests.save_request(&request).await?;
                self.forget_pending(&request).await;

                let _ = self
                    .events
                    .send(MarketEvent::RequestDecided(RequestDecidedEvent {
                        request_id: request.id,
                        listing_id: request.listing_id,
                        seller_id: request.seller_id,
                        approved: false,
                        remaining_quantity: None,
                        timestamp: Utc::now().timestamp(),
                    }));
                info!(request_id = %request.id, "request rejected");

                Ok(DecisionOutcome {
                    request,
                    remaining_quantity: None,
                    listing_status: None,
                    buyer_contact: None,
                    seller_contact: None,
                })
            }
            Decision::Approve => {
                // Re-read: another approval may have drained stock since this
                // request was created.
                let mut listing = self
                    .listings
                    .get_listing(request.listing_id)
                    .await?
                    .ok_or(RequestError::NotFound("listing"))?;

                let remaining = listing.debit(request.quantity).map_err(
                    |StockError::InsufficientStock {
                         requested,
                         available,
                     }| RequestError::InsufficientStock {
                        requested,
                        available,
                    },
                )?;

                self.listings.save_listing(&listing).await?;
                request.update_status(crate::models::RequestStatus::Approved);
                // The two writes are not atomic. If the request write fails
                // the stock is re-credited so a retried decide cannot debit
                // twice; the request stays pending in the store.
                if let Err(err) = self.requests.save_request(&request).await {
                    listing.credit(request.quantity);
                    if let Err(undo) = self.listings.save_listing(&listing).await {
                        error!(
                            listing_id = %listing.id,
                            "stock re-credit failed after request write error: {}",
                            undo
                        );
                    }
                    return Err(err.into());
                }
                self.forget_pending(&request).await;

                // Approval is the moment contact details are exchanged.
                let buyer = self.users.get_user(request.buyer_id).await?;
                let seller = self.users.get_user(request.seller_id).await?;

                let _ = self
                    .events
                    .send(MarketEvent::RequestDecided(RequestDecidedEvent {
                        request_id: request.id,
                        listing_id: request.listing_id,
                        seller_id: request.seller_id,
                        approved: true,
                        remaining_quantity: Some(remaining),
                        timestamp: Utc::now().timestamp(),
                    }));
                if listing.status == ListingStatus::Sold {
                    let _ = self.events.send(MarketEvent::ListingSold(ListingSoldEvent {
                        listing_id: listing.id,
                        seller_id: listing.seller_id,
                        timestamp: Utc::now().timestamp(),
                    }));
                }
                info!(
                    request_id = %request.id,
                    listing_id = %listing.id,
                    remaining,
                    "request approved"
                );

                Ok(DecisionOutcome {
                    request,
                    remaining_quantity: Some(remaining),
                    listing_status: Some(listing.status),
                    buyer_contact: buyer.as_ref().map(ContactCard::from),
                    seller_contact: seller.as_ref().map(ContactCard::from),
                })
            }
        }
    }

    /// All requests visible to the actor, partitioned by role. The server is
    /// the source of truth: the result overwrites any prior view, and the
    /// actor's pending-pair cache is rebuilt from it.
    pub async fn list_requests(&self, session: &Session) -> Result<RequestLedger, RequestError> {
        let all = self.requests.list_for_user(session.user_id).await?;

        {
            let mut pairs = self.pending_pairs.write().await;
            pairs.retain(|(buyer, _)| *buyer != session.user_id);
            for request in &all {
                if request.is_pending() && request.buyer_id == session.user_id {
                    pairs.insert((request.buyer_id, request.listing_id));
                }
            }
        }

        let mut ledger = RequestLedger::default();
        for request in all {
            let listing = self.listings.get_listing(request.listing_id).await?;
            let view = RequestView { request, listing };
            if view.request.seller_id == session.user_id {
                ledger.as_seller.push(view);
            } else {
                ledger.as_buyer.push(view);
            }
        }

        Ok(ledger)
    }

    async fn forget_pending(&self, request: &TransactionRequest) {
        self.pending_pairs
            .write()
            .await
            .remove(&(request.buyer_id, request.listing_id));
    }
}
