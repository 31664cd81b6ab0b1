use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::entities::{Meeting, MeetingDraft};
use crate::domain::repositories::MeetingRepository;
use crate::infrastructure::database::entity::{meeting_reminders, meetings};
use crate::shared::{Result, TaskchiError};

pub struct SeaOrmMeetingRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmMeetingRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Load reminder offsets for a batch of meetings, keyed by meeting id,
    /// in stored order.
    async fn load_reminders(&self, meeting_ids: Vec<i64>) -> Result<HashMap<i64, Vec<i32>>> {
        if meeting_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = meeting_reminders::Entity::find()
            .filter(meeting_reminders::Column::MeetingId.is_in(meeting_ids))
            .order_by_asc(meeting_reminders::Column::MeetingId)
            .order_by_asc(meeting_reminders::Column::SortIndex)
            .all(self.db.as_ref())
            .await?;

        let mut out: HashMap<i64, Vec<i32>> = HashMap::new();
        for row in rows {
            out.entry(row.meeting_id).or_default().push(row.minutes_before);
        }
        Ok(out)
    }

    async fn save_reminders(&self, meeting_id: i64, offsets: &[i32]) -> Result<()> {
        meeting_reminders::Entity::delete_many()
            .filter(meeting_reminders::Column::MeetingId.eq(meeting_id))
            .exec(self.db.as_ref())
            .await?;

        let rows: Vec<meeting_reminders::ActiveModel> = offsets
            .iter()
            .enumerate()
            .map(|(index, minutes)| meeting_reminders::ActiveModel {
                meeting_id: Set(meeting_id),
                sort_index: Set(index as i32),
                minutes_before: Set(*minutes),
            })
            .collect();

        if !rows.is_empty() {
            meeting_reminders::Entity::insert_many(rows)
                .exec(self.db.as_ref())
                .await?;
        }

        Ok(())
    }

    async fn to_domain_batch(&self, models: Vec<meetings::Model>) -> Result<Vec<Meeting>> {
        let ids = models.iter().map(|m| m.id).collect();
        let mut reminders = self.load_reminders(ids).await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let reminder_minutes_before = reminders.remove(&m.id).unwrap_or_default();
                to_domain(m, reminder_minutes_before)
            })
            .collect())
    }
}

fn to_domain(model: meetings::Model, reminder_minutes_before: Vec<i32>) -> Meeting {
    Meeting {
        id: model.id,
        title: model.title,
        date: model.date,
        start_time: model.start_time,
        end_time: model.end_time,
        all_day: model.all_day,
        alarm_enabled: model.alarm_enabled,
        location: model.location,
        content: model.content,
        outcome: model.outcome,
        created_by_id: model.created_by_id,
        reminder_minutes_before,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[async_trait]
impl MeetingRepository for SeaOrmMeetingRepository {
    async fn create(&self, owner_id: i64, draft: MeetingDraft) -> Result<Meeting> {
        let now = Utc::now();
        let model = meetings::ActiveModel {
            title: Set(draft.title),
            date: Set(draft.date),
            start_time: Set(draft.start_time),
            end_time: Set(draft.end_time),
            all_day: Set(draft.all_day),
            alarm_enabled: Set(draft.alarm_enabled),
            location: Set(draft.location),
            content: Set(draft.content),
            outcome: Set(draft.outcome),
            created_by_id: Set(Some(owner_id)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = meetings::Entity::insert(model)
            .exec_with_returning(self.db.as_ref())
            .await?;

        self.save_reminders(inserted.id, &draft.reminder_minutes_before)
            .await?;

        Ok(to_domain(inserted, draft.reminder_minutes_before))
    }

    async fn find_for_owner(&self, id: i64, owner_id: i64) -> Result<Option<Meeting>> {
        let model = meetings::Entity::find_by_id(id)
            .filter(meetings::Column::CreatedById.eq(owner_id))
            .one(self.db.as_ref())
            .await?;

        match model {
            Some(model) => Ok(self.to_domain_batch(vec![model]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    async fn list_for_owner_in_range(
        &self,
        owner_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Meeting>> {
        let models = meetings::Entity::find()
            .filter(meetings::Column::CreatedById.eq(owner_id))
            .filter(meetings::Column::Date.between(from, to))
            .order_by_asc(meetings::Column::Date)
            .all(self.db.as_ref())
            .await?;
        self.to_domain_batch(models).await
    }

    async fn list_in_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Meeting>> {
        let models = meetings::Entity::find()
            .filter(meetings::Column::Date.between(from, to))
            .order_by_asc(meetings::Column::Date)
            .all(self.db.as_ref())
            .await?;
        self.to_domain_batch(models).await
    }

    async fn update(&self, id: i64, owner_id: i64, draft: MeetingDraft) -> Result<Meeting> {
        let existing = meetings::Entity::find_by_id(id)
            .filter(meetings::Column::CreatedById.eq(owner_id))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| TaskchiError::NotFound {
                resource: format!("Meeting with id: {}", id),
            })?;

        let model = meetings::ActiveModel {
            id: Set(existing.id),
            title: Set(draft.title),
            date: Set(draft.date),
            start_time: Set(draft.start_time),
            end_time: Set(draft.end_time),
            all_day: Set(draft.all_day),
            alarm_enabled: Set(draft.alarm_enabled),
            location: Set(draft.location),
            content: Set(draft.content),
            outcome: Set(draft.outcome),
            created_by_id: Set(existing.created_by_id),
            created_at: Set(existing.created_at),
            updated_at: Set(Utc::now()),
        };

        let updated = meetings::Entity::update(model).exec(self.db.as_ref()).await?;

        self.save_reminders(updated.id, &draft.reminder_minutes_before)
            .await?;

        Ok(to_domain(updated, draft.reminder_minutes_before))
    }

    async fn delete(&self, id: i64, owner_id: i64) -> Result<()> {
        let existing = meetings::Entity::find_by_id(id)
            .filter(meetings::Column::CreatedById.eq(owner_id))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| TaskchiError::NotFound {
                resource: format!("Meeting with id: {}", id),
            })?;

        meeting_reminders::Entity::delete_many()
            .filter(meeting_reminders::Column::MeetingId.eq(existing.id))
            .exec(self.db.as_ref())
            .await?;

        meetings::Entity::delete_by_id(existing.id)
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }
}
