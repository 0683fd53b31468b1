use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{
        leaddb::LeadExt,
        propertydb::{PropertyDeletion, PropertyExt},
    },
    dtos::{
        leaddtos::{CreateLeadDto, UpdateLeadDto},
        propertydtos::{CreatePropertyDto, UpdatePropertyDto},
    },
    models::{leadmodel::Lead, propertymodel::Property},
    service::error::ServiceError,
};

/// The property status writes a lead operation must apply: the released
/// property goes back to `available`, the booked one becomes `booked`.
/// Derived once per operation so every status write flows through here.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TransitionPlan {
    pub release: Option<Uuid>,
    pub book: Option<Uuid>,
}

/// Decides the status transitions for a lead update. `requested` carries the
/// tri-state `property_id` field: absent keeps the current reference, an
/// explicit null clears it (releasing the property), a value re-assigns.
/// Re-submitting the current property is a no-op on statuses.
pub fn plan_transition(current: Option<Uuid>, requested: Option<Option<Uuid>>) -> TransitionPlan {
    match requested {
        None => TransitionPlan::default(),
        Some(None) => TransitionPlan {
            release: current,
            book: None,
        },
        Some(Some(new_property_id)) if current == Some(new_property_id) => {
            TransitionPlan::default()
        }
        Some(Some(new_property_id)) => TransitionPlan {
            release: current,
            book: Some(new_property_id),
        },
    }
}

/// Single choke point for the lead-property assignment lifecycle. All
/// `Property.status` bookkeeping happens through these operations; nothing
/// else in the crate writes that field except the explicit status edit on
/// `update_property`, which is the documented escape hatch.
#[derive(Debug, Clone)]
pub struct AssignmentService<S> {
    store: Arc<S>,
}

impl<S> AssignmentService<S>
where
    S: LeadExt + PropertyExt + Send + Sync,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create_lead(
        &self,
        agent_id: Uuid,
        lead_data: CreateLeadDto,
    ) -> Result<Lead, ServiceError> {
        if lead_data.client_name.trim().is_empty() || lead_data.client_phone.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Client name and phone required".to_string(),
            ));
        }

        // Ownership check before any write: a foreign property id must fail
        // the whole operation with nothing inserted and nothing booked.
        if let Some(property_id) = lead_data.property_id {
            self.store
                .get_property(property_id, agent_id)
                .await?
                .ok_or(ServiceError::PropertyNotFound(property_id))?;
        }

        let lead = self.store.insert_lead(agent_id, &lead_data).await?;

        Ok(lead)
    }

    pub async fn get_lead(
        &self,
        lead_id: Uuid,
        agent_id: Uuid,
    ) -> Result<(Lead, Option<Property>), ServiceError> {
        let lead = self
            .store
            .get_lead(lead_id, agent_id)
            .await?
            .ok_or(ServiceError::LeadNotFound(lead_id))?;

        let property = match lead.property_id {
            Some(property_id) => self.store.get_property(property_id, agent_id).await?,
            None => None,
        };

        Ok((lead, property))
    }

    pub async fn list_leads(&self, agent_id: Uuid) -> Result<Vec<Lead>, ServiceError> {
        Ok(self.store.list_leads(agent_id).await?)
    }

    pub async fn update_lead(
        &self,
        lead_id: Uuid,
        agent_id: Uuid,
        changes: UpdateLeadDto,
    ) -> Result<Lead, ServiceError> {
        let lead = self
            .store
            .get_lead(lead_id, agent_id)
            .await?
            .ok_or(ServiceError::LeadNotFound(lead_id))?;

        let plan = plan_transition(lead.property_id, changes.property_id);

        if let Some(new_property_id) = plan.book {
            self.store
                .get_property(new_property_id, agent_id)
                .await?
                .ok_or(ServiceError::PropertyNotFound(new_property_id))?;
        }

        let updated = self
            .store
            .update_lead(lead_id, agent_id, &changes, plan.release, plan.book)
            .await?
            .ok_or(ServiceError::LeadNotFound(lead_id))?;

        Ok(updated)
    }

    pub async fn delete_lead(&self, lead_id: Uuid, agent_id: Uuid) -> Result<(), ServiceError> {
        let deleted = self.store.delete_lead(lead_id, agent_id).await?;

        if !deleted {
            return Err(ServiceError::LeadNotFound(lead_id));
        }

        Ok(())
    }

    pub async fn create_property(
        &self,
        agent_id: Uuid,
        property_data: CreatePropertyDto,
    ) -> Result<Property, ServiceError> {
        if property_data.address.trim().is_empty() {
            return Err(ServiceError::Validation("Address required".to_string()));
        }

        Ok(self.store.create_property(agent_id, &property_data).await?)
    }

    pub async fn list_properties(&self, agent_id: Uuid) -> Result<Vec<Property>, ServiceError> {
        Ok(self.store.list_properties(agent_id).await?)
    }

    pub async fn list_properties_for_assignment(
        &self,
        agent_id: Uuid,
    ) -> Result<Vec<Property>, ServiceError> {
        Ok(self.store.list_properties_for_assignment(agent_id).await?)
    }

    /// Status-only payloads take the escape hatch: a direct overwrite that
    /// skips lead-consistency checks (agent-driven corrections, marking a
    /// property sold). Anything else is a detail edit that never touches
    /// status.
    pub async fn update_property(
        &self,
        property_id: Uuid,
        agent_id: Uuid,
        property_data: UpdatePropertyDto,
    ) -> Result<Property, ServiceError> {
        let updated = match property_data.status {
            Some(status) if property_data.is_status_only() => {
                self.store
                    .set_property_status(property_id, agent_id, status)
                    .await?
            }
            _ => {
                self.store
                    .update_property_details(property_id, agent_id, &property_data)
                    .await?
            }
        };

        updated.ok_or(ServiceError::PropertyNotFound(property_id))
    }

    pub async fn delete_property(
        &self,
        property_id: Uuid,
        agent_id: Uuid,
    ) -> Result<(), ServiceError> {
        match self.store.delete_property(property_id, agent_id).await? {
            PropertyDeletion::Deleted => Ok(()),
            PropertyDeletion::NotFound => Err(ServiceError::PropertyNotFound(property_id)),
            PropertyDeletion::Referenced(leads) => Err(ServiceError::PropertyStillReferenced {
                property_id,
                leads,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bigdecimal::BigDecimal;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::models::{
        leadmodel::LEAD_STATUS_NEW,
        propertymodel::PropertyStatus,
    };

    /// In-memory stand-in for the Postgres store. Each composite operation
    /// applies the same effects the transactional implementation commits.
    #[derive(Default)]
    struct MemStore {
        leads: Mutex<HashMap<Uuid, Lead>>,
        properties: Mutex<HashMap<Uuid, Property>>,
    }

    impl MemStore {
        fn seed_property(&self, agent_id: Uuid, address: &str) -> Uuid {
            let id = Uuid::new_v4();
            self.properties.lock().unwrap().insert(
                id,
                Property {
                    id,
                    agent_id,
                    address: address.to_string(),
                    bedrooms: Some(3),
                    bathrooms: Some(2),
                    price: Some(BigDecimal::from(45_000_000)),
                    property_type: Some("house".to_string()),
                    status: PropertyStatus::Available,
                    created_at: Some(Utc::now()),
                },
            );
            id
        }

        fn property_status(&self, property_id: Uuid) -> PropertyStatus {
            self.properties.lock().unwrap()[&property_id].status
        }

        fn lead_count(&self) -> usize {
            self.leads.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PropertyExt for MemStore {
        async fn create_property(
            &self,
            agent_id: Uuid,
            property_data: &CreatePropertyDto,
        ) -> Result<Property, sqlx::Error> {
            let property = Property {
                id: Uuid::new_v4(),
                agent_id,
                address: property_data.address.clone(),
                bedrooms: property_data.bedrooms,
                bathrooms: property_data.bathrooms,
                price: property_data.price.clone(),
                property_type: property_data.property_type.clone(),
                status: PropertyStatus::Available,
                created_at: Some(Utc::now()),
            };
            self.properties
                .lock()
                .unwrap()
                .insert(property.id, property.clone());
            Ok(property)
        }

        async fn get_property(
            &self,
            property_id: Uuid,
            agent_id: Uuid,
        ) -> Result<Option<Property>, sqlx::Error> {
            Ok(self
                .properties
                .lock()
                .unwrap()
                .get(&property_id)
                .filter(|p| p.agent_id == agent_id)
                .cloned())
        }

        async fn list_properties(&self, agent_id: Uuid) -> Result<Vec<Property>, sqlx::Error> {
            let mut properties: Vec<Property> = self
                .properties
                .lock()
                .unwrap()
                .values()
                .filter(|p| p.agent_id == agent_id)
                .cloned()
                .collect();
            properties.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(properties)
        }

        async fn list_properties_for_assignment(
            &self,
            agent_id: Uuid,
        ) -> Result<Vec<Property>, sqlx::Error> {
            let mut properties = self.list_properties(agent_id).await?;
            properties.sort_by(|a, b| {
                (b.status as u8)
                    .cmp(&(a.status as u8))
                    .then(a.address.cmp(&b.address))
            });
            Ok(properties)
        }

        async fn update_property_details(
            &self,
            property_id: Uuid,
            agent_id: Uuid,
            property_data: &UpdatePropertyDto,
        ) -> Result<Option<Property>, sqlx::Error> {
            let mut properties = self.properties.lock().unwrap();
            let Some(property) = properties
                .get_mut(&property_id)
                .filter(|p| p.agent_id == agent_id)
            else {
                return Ok(None);
            };
            if let Some(address) = &property_data.address {
                property.address = address.clone();
            }
            if let Some(bedrooms) = property_data.bedrooms {
                property.bedrooms = Some(bedrooms);
            }
            if let Some(bathrooms) = property_data.bathrooms {
                property.bathrooms = Some(bathrooms);
            }
            if let Some(price) = &property_data.price {
                property.price = Some(price.clone());
            }
            if let Some(property_type) = &property_data.property_type {
                property.property_type = Some(property_type.clone());
            }
            Ok(Some(property.clone()))
        }

        async fn set_property_status(
            &self,
            property_id: Uuid,
            agent_id: Uuid,
            status: PropertyStatus,
        ) -> Result<Option<Property>, sqlx::Error> {
            let mut properties = self.properties.lock().unwrap();
            let Some(property) = properties
                .get_mut(&property_id)
                .filter(|p| p.agent_id == agent_id)
            else {
                return Ok(None);
            };
            property.status = status;
            Ok(Some(property.clone()))
        }

        async fn delete_property(
            &self,
            property_id: Uuid,
            agent_id: Uuid,
        ) -> Result<PropertyDeletion, sqlx::Error> {
            let owned = self
                .properties
                .lock()
                .unwrap()
                .get(&property_id)
                .map_or(false, |p| p.agent_id == agent_id);
            if !owned {
                return Ok(PropertyDeletion::NotFound);
            }

            let references = self
                .leads
                .lock()
                .unwrap()
                .values()
                .filter(|l| l.property_id == Some(property_id))
                .count() as i64;
            if references > 0 {
                return Ok(PropertyDeletion::Referenced(references));
            }

            self.properties.lock().unwrap().remove(&property_id);
            Ok(PropertyDeletion::Deleted)
        }
    }

    #[async_trait]
    impl LeadExt for MemStore {
        async fn get_lead(
            &self,
            lead_id: Uuid,
            agent_id: Uuid,
        ) -> Result<Option<Lead>, sqlx::Error> {
            Ok(self
                .leads
                .lock()
                .unwrap()
                .get(&lead_id)
                .filter(|l| l.agent_id == agent_id)
                .cloned())
        }

        async fn list_leads(&self, agent_id: Uuid) -> Result<Vec<Lead>, sqlx::Error> {
            let mut leads: Vec<Lead> = self
                .leads
                .lock()
                .unwrap()
                .values()
                .filter(|l| l.agent_id == agent_id)
                .cloned()
                .collect();
            leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(leads)
        }

        async fn insert_lead(
            &self,
            agent_id: Uuid,
            lead_data: &CreateLeadDto,
        ) -> Result<Lead, sqlx::Error> {
            if let Some(property_id) = lead_data.property_id {
                let owned = self
                    .properties
                    .lock()
                    .unwrap()
                    .get(&property_id)
                    .map_or(false, |p| p.agent_id == agent_id);
                if !owned {
                    return Err(sqlx::Error::RowNotFound);
                }
            }

            let now = Utc::now();
            let lead = Lead {
                id: Uuid::new_v4(),
                agent_id,
                property_id: lead_data.property_id,
                client_name: lead_data.client_name.clone(),
                client_phone: lead_data.client_phone.clone(),
                property_interest: lead_data.property_interest.clone(),
                status: LEAD_STATUS_NEW.to_string(),
                follow_up_date: lead_data.follow_up_date,
                notes: lead_data.notes.clone(),
                created_at: Some(now),
                updated_at: Some(now),
            };
            self.leads.lock().unwrap().insert(lead.id, lead.clone());

            if let Some(property_id) = lead_data.property_id {
                self.properties
                    .lock()
                    .unwrap()
                    .get_mut(&property_id)
                    .unwrap()
                    .status = PropertyStatus::Booked;
            }

            Ok(lead)
        }

        async fn update_lead(
            &self,
            lead_id: Uuid,
            agent_id: Uuid,
            changes: &UpdateLeadDto,
            release: Option<Uuid>,
            book: Option<Uuid>,
        ) -> Result<Option<Lead>, sqlx::Error> {
            if self.get_lead(lead_id, agent_id).await?.is_none() {
                return Ok(None);
            }

            if let Some(old_property_id) = release {
                if let Some(property) = self
                    .properties
                    .lock()
                    .unwrap()
                    .get_mut(&old_property_id)
                    .filter(|p| p.agent_id == agent_id)
                {
                    property.status = PropertyStatus::Available;
                }
            }

            if let Some(new_property_id) = book {
                let mut properties = self.properties.lock().unwrap();
                let Some(property) = properties
                    .get_mut(&new_property_id)
                    .filter(|p| p.agent_id == agent_id)
                else {
                    return Err(sqlx::Error::RowNotFound);
                };
                property.status = PropertyStatus::Booked;
            }

            let mut leads = self.leads.lock().unwrap();
            let lead = leads.get_mut(&lead_id).unwrap();
            if let Some(client_name) = &changes.client_name {
                lead.client_name = client_name.clone();
            }
            if let Some(client_phone) = &changes.client_phone {
                lead.client_phone = client_phone.clone();
            }
            if let Some(property_interest) = &changes.property_interest {
                lead.property_interest = Some(property_interest.clone());
            }
            if let Some(status) = &changes.status {
                lead.status = status.clone();
            }
            if let Some(follow_up_date) = changes.follow_up_date {
                lead.follow_up_date = Some(follow_up_date);
            }
            if let Some(notes) = &changes.notes {
                lead.notes = Some(notes.clone());
            }
            if let Some(property_id) = changes.property_id {
                lead.property_id = property_id;
            }
            lead.updated_at = Some(Utc::now());

            Ok(Some(lead.clone()))
        }

        async fn delete_lead(&self, lead_id: Uuid, agent_id: Uuid) -> Result<bool, sqlx::Error> {
            let removed = {
                let mut leads = self.leads.lock().unwrap();
                match leads.get(&lead_id) {
                    Some(lead) if lead.agent_id == agent_id => leads.remove(&lead_id),
                    _ => None,
                }
            };

            let Some(lead) = removed else {
                return Ok(false);
            };

            if let Some(property_id) = lead.property_id {
                if let Some(property) = self.properties.lock().unwrap().get_mut(&property_id) {
                    property.status = PropertyStatus::Available;
                }
            }

            Ok(true)
        }
    }

    fn service() -> (AssignmentService<MemStore>, Arc<MemStore>) {
        let store = Arc::new(MemStore::default());
        (AssignmentService::new(store.clone()), store)
    }

    fn lead_dto(property_id: Option<Uuid>) -> CreateLeadDto {
        CreateLeadDto {
            client_name: "Jane Wanjiru".to_string(),
            client_phone: "+254712345678".to_string(),
            property_interest: Some("3BR house".to_string()),
            property_id,
            follow_up_date: None,
            notes: None,
        }
    }

    #[test]
    fn plan_keeps_statuses_when_property_id_absent() {
        let current = Some(Uuid::new_v4());
        assert_eq!(plan_transition(current, None), TransitionPlan::default());
    }

    #[test]
    fn plan_releases_on_explicit_null() {
        let current = Uuid::new_v4();
        let plan = plan_transition(Some(current), Some(None));
        assert_eq!(plan.release, Some(current));
        assert_eq!(plan.book, None);
    }

    #[test]
    fn plan_swaps_on_reassignment() {
        let old = Uuid::new_v4();
        let new = Uuid::new_v4();
        let plan = plan_transition(Some(old), Some(Some(new)));
        assert_eq!(plan.release, Some(old));
        assert_eq!(plan.book, Some(new));
    }

    #[test]
    fn plan_is_noop_for_same_property() {
        let current = Uuid::new_v4();
        assert_eq!(
            plan_transition(Some(current), Some(Some(current))),
            TransitionPlan::default()
        );
    }

    #[test]
    fn plan_books_from_unassigned() {
        let new = Uuid::new_v4();
        let plan = plan_transition(None, Some(Some(new)));
        assert_eq!(plan.release, None);
        assert_eq!(plan.book, Some(new));
    }

    #[tokio::test]
    async fn create_lead_books_the_property() {
        let (svc, store) = service();
        let agent_id = Uuid::new_v4();
        let property_id = store.seed_property(agent_id, "12 Rose St");

        let lead = svc
            .create_lead(agent_id, lead_dto(Some(property_id)))
            .await
            .unwrap();

        assert_eq!(lead.status, LEAD_STATUS_NEW);
        assert_eq!(lead.property_id, Some(property_id));
        assert_eq!(store.property_status(property_id), PropertyStatus::Booked);
    }

    #[tokio::test]
    async fn create_lead_requires_name_and_phone() {
        let (svc, store) = service();
        let agent_id = Uuid::new_v4();

        let mut missing_name = lead_dto(None);
        missing_name.client_name = "".to_string();
        let err = svc.create_lead(agent_id, missing_name).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let mut missing_phone = lead_dto(None);
        missing_phone.client_phone = "  ".to_string();
        let err = svc.create_lead(agent_id, missing_phone).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        assert_eq!(store.lead_count(), 0);
    }

    #[tokio::test]
    async fn create_lead_rejects_foreign_property() {
        let (svc, store) = service();
        let agent_a = Uuid::new_v4();
        let agent_b = Uuid::new_v4();
        let property_id = store.seed_property(agent_a, "4 Acacia Ave");

        let err = svc
            .create_lead(agent_b, lead_dto(Some(property_id)))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::PropertyNotFound(_)));
        assert_eq!(store.lead_count(), 0);
        assert_eq!(
            store.property_status(property_id),
            PropertyStatus::Available
        );
    }

    #[tokio::test]
    async fn reassignment_releases_old_and_books_new() {
        let (svc, store) = service();
        let agent_id = Uuid::new_v4();
        let p1 = store.seed_property(agent_id, "Plot 1");
        let p2 = store.seed_property(agent_id, "Plot 2");

        let lead = svc.create_lead(agent_id, lead_dto(Some(p1))).await.unwrap();
        assert_eq!(store.property_status(p1), PropertyStatus::Booked);

        let changes = UpdateLeadDto {
            property_id: Some(Some(p2)),
            ..Default::default()
        };
        let updated = svc.update_lead(lead.id, agent_id, changes).await.unwrap();

        assert_eq!(updated.property_id, Some(p2));
        assert_eq!(store.property_status(p1), PropertyStatus::Available);
        assert_eq!(store.property_status(p2), PropertyStatus::Booked);
    }

    #[tokio::test]
    async fn clearing_the_reference_releases_the_property() {
        let (svc, store) = service();
        let agent_id = Uuid::new_v4();
        let property_id = store.seed_property(agent_id, "12 Rose St");

        let lead = svc
            .create_lead(agent_id, lead_dto(Some(property_id)))
            .await
            .unwrap();

        let changes = UpdateLeadDto {
            property_id: Some(None),
            ..Default::default()
        };
        let updated = svc.update_lead(lead.id, agent_id, changes).await.unwrap();

        assert_eq!(updated.property_id, None);
        assert_eq!(
            store.property_status(property_id),
            PropertyStatus::Available
        );
    }

    #[tokio::test]
    async fn unchanged_reference_writes_no_statuses() {
        let (svc, store) = service();
        let agent_id = Uuid::new_v4();
        let property_id = store.seed_property(agent_id, "12 Rose St");

        let lead = svc
            .create_lead(agent_id, lead_dto(Some(property_id)))
            .await
            .unwrap();

        // Mark sold through the escape hatch, then re-submit the same
        // property id: no automatic write may touch the sold status.
        svc.update_property(
            property_id,
            agent_id,
            UpdatePropertyDto {
                status: Some(PropertyStatus::Sold),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let changes = UpdateLeadDto {
            property_id: Some(Some(property_id)),
            status: Some("contacted".to_string()),
            ..Default::default()
        };
        let updated = svc.update_lead(lead.id, agent_id, changes).await.unwrap();

        assert_eq!(updated.status, "contacted");
        assert_eq!(store.property_status(property_id), PropertyStatus::Sold);
    }

    #[tokio::test]
    async fn failed_reassignment_leaves_everything_untouched() {
        let (svc, store) = service();
        let agent_a = Uuid::new_v4();
        let agent_b = Uuid::new_v4();
        let p1 = store.seed_property(agent_a, "Plot 1");
        let foreign = store.seed_property(agent_b, "Plot 2");

        let lead = svc.create_lead(agent_a, lead_dto(Some(p1))).await.unwrap();

        let changes = UpdateLeadDto {
            property_id: Some(Some(foreign)),
            ..Default::default()
        };
        let err = svc
            .update_lead(lead.id, agent_a, changes)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::PropertyNotFound(_)));
        assert_eq!(store.property_status(p1), PropertyStatus::Booked);
        assert_eq!(store.property_status(foreign), PropertyStatus::Available);

        let (unchanged, _) = svc.get_lead(lead.id, agent_a).await.unwrap();
        assert_eq!(unchanged.property_id, Some(p1));
    }

    #[tokio::test]
    async fn partial_update_preserves_other_fields() {
        let (svc, _store) = service();
        let agent_id = Uuid::new_v4();

        let lead = svc.create_lead(agent_id, lead_dto(None)).await.unwrap();

        let changes = UpdateLeadDto {
            status: Some("interested".to_string()),
            ..Default::default()
        };
        let updated = svc.update_lead(lead.id, agent_id, changes).await.unwrap();

        assert_eq!(updated.status, "interested");
        assert_eq!(updated.client_name, "Jane Wanjiru");
        assert_eq!(updated.client_phone, "+254712345678");
    }

    #[tokio::test]
    async fn deleting_the_lead_releases_its_property() {
        let (svc, store) = service();
        let agent_id = Uuid::new_v4();
        let property_id = store.seed_property(agent_id, "12 Rose St");

        let lead = svc
            .create_lead(agent_id, lead_dto(Some(property_id)))
            .await
            .unwrap();

        svc.delete_lead(lead.id, agent_id).await.unwrap();

        assert_eq!(store.lead_count(), 0);
        assert_eq!(
            store.property_status(property_id),
            PropertyStatus::Available
        );
    }

    #[tokio::test]
    async fn delete_lead_is_scoped_to_the_owner() {
        let (svc, store) = service();
        let agent_a = Uuid::new_v4();
        let agent_b = Uuid::new_v4();

        let lead = svc.create_lead(agent_a, lead_dto(None)).await.unwrap();

        let err = svc.delete_lead(lead.id, agent_b).await.unwrap_err();
        assert!(matches!(err, ServiceError::LeadNotFound(_)));
        assert_eq!(store.lead_count(), 1);
    }

    #[tokio::test]
    async fn referenced_property_cannot_be_deleted() {
        let (svc, store) = service();
        let agent_id = Uuid::new_v4();
        let property_id = store.seed_property(agent_id, "12 Rose St");

        svc.create_lead(agent_id, lead_dto(Some(property_id)))
            .await
            .unwrap();

        let err = svc
            .delete_property(property_id, agent_id)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::PropertyStillReferenced { leads: 1, .. }
        ));
        assert_eq!(store.property_status(property_id), PropertyStatus::Booked);
    }

    #[tokio::test]
    async fn released_property_can_be_deleted() {
        // Full lifecycle: create property, book it through a lead, clear
        // the reference, then deletion succeeds.
        let (svc, store) = service();
        let agent_id = Uuid::new_v4();
        let property_id = store.seed_property(agent_id, "12 Rose St");

        let lead = svc
            .create_lead(agent_id, lead_dto(Some(property_id)))
            .await
            .unwrap();

        let changes = UpdateLeadDto {
            property_id: Some(None),
            ..Default::default()
        };
        svc.update_lead(lead.id, agent_id, changes).await.unwrap();

        svc.delete_property(property_id, agent_id).await.unwrap();
        assert!(store.properties.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn detail_edit_never_touches_status() {
        let (svc, store) = service();
        let agent_id = Uuid::new_v4();
        let property_id = store.seed_property(agent_id, "12 Rose St");

        svc.create_lead(agent_id, lead_dto(Some(property_id)))
            .await
            .unwrap();

        let updated = svc
            .update_property(
                property_id,
                agent_id,
                UpdatePropertyDto {
                    address: Some("14 Rose St".to_string()),
                    price: Some(BigDecimal::from(50_000_000)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.address, "14 Rose St");
        assert_eq!(updated.price, Some(BigDecimal::from(50_000_000)));
        assert_eq!(store.property_status(property_id), PropertyStatus::Booked);
    }

    #[tokio::test]
    async fn status_edit_bypasses_lead_checks() {
        let (svc, store) = service();
        let agent_id = Uuid::new_v4();
        let property_id = store.seed_property(agent_id, "12 Rose St");

        svc.create_lead(agent_id, lead_dto(Some(property_id)))
            .await
            .unwrap();

        // Sold while still referenced: allowed by design.
        let updated = svc
            .update_property(
                property_id,
                agent_id,
                UpdatePropertyDto {
                    status: Some(PropertyStatus::Sold),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, PropertyStatus::Sold);
    }

    #[tokio::test]
    async fn get_lead_joins_the_property_summary() {
        let (svc, store) = service();
        let agent_id = Uuid::new_v4();
        let property_id = store.seed_property(agent_id, "12 Rose St");

        let lead = svc
            .create_lead(agent_id, lead_dto(Some(property_id)))
            .await
            .unwrap();

        let (fetched, property) = svc.get_lead(lead.id, agent_id).await.unwrap();
        assert_eq!(fetched.id, lead.id);
        let property = property.unwrap();
        assert_eq!(property.id, property_id);
        assert_eq!(property.status, PropertyStatus::Booked);

        // Another agent sees the same id as missing.
        let err = svc.get_lead(lead.id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::LeadNotFound(_)));
    }
}
