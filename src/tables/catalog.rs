//! Built-in table catalog
//!
//! The default set of Daktela entities this extractor knows how to shape.
//! Column lists select and order the output; reference keys are the columns
//! that point at other entities and therefore get the server prefix.
//! Tables filtered on `edited` participate in the extraction window.

use super::types::{ParentLink, TableSpec};

struct SpecBuilder(TableSpec);

fn table(name: &str) -> SpecBuilder {
    SpecBuilder(TableSpec {
        name: name.to_string(),
        endpoint: name.to_string(),
        date_field: None,
        parent: None,
        natural_keys: vec!["name".to_string()],
        columns: Vec::new(),
        ref_keys: Vec::new(),
        list_columns: Vec::new(),
        list_of_dicts_columns: Vec::new(),
    })
}

impl SpecBuilder {
    fn endpoint(mut self, endpoint: &str) -> Self {
        self.0.endpoint = endpoint.to_string();
        self
    }

    fn date_filtered(mut self) -> Self {
        self.0.date_field = Some("edited".to_string());
        self
    }

    fn natural_keys(mut self, keys: &[&str]) -> Self {
        self.0.natural_keys = keys.iter().map(ToString::to_string).collect();
        self
    }

    fn columns(mut self, columns: &[&str]) -> Self {
        self.0.columns = columns.iter().map(ToString::to_string).collect();
        self
    }

    fn ref_keys(mut self, keys: &[&str]) -> Self {
        self.0.ref_keys = keys.iter().map(ToString::to_string).collect();
        self
    }

    fn list_columns(mut self, columns: &[&str]) -> Self {
        self.0.list_columns = columns.iter().map(ToString::to_string).collect();
        self
    }

    fn list_of_dicts_columns(mut self, columns: &[&str]) -> Self {
        self.0.list_of_dicts_columns = columns.iter().map(ToString::to_string).collect();
        self
    }

    fn child_of(mut self, parent: &str, segment: &str, key_column: &str) -> Self {
        self.0.endpoint = parent.to_string();
        self.0.parent = Some(ParentLink {
            table: parent.to_string(),
            segment: segment.to_string(),
            key_column: key_column.to_string(),
        });
        self
    }

    fn build(self) -> TableSpec {
        self.0
    }
}

/// All built-in table specs
pub(super) fn default_specs() -> Vec<TableSpec> {
    vec![
        table("activities")
            .date_filtered()
            .columns(&[
                "name", "title", "description", "direction", "time", "time_open", "time_close",
                "stage", "action", "clid", "did", "queue.name", "queue.title", "user.name",
                "user.title", "contact.name", "contact.title", "account.name", "account.title",
                "ticket.name", "ticket.title", "campaign.name", "campaign.title", "call.name",
                "edited", "created",
            ])
            .ref_keys(&[
                "queue.name", "user.name", "contact.name", "account.name", "ticket.name",
                "campaign.name",
            ])
            .build(),
        table("contacts")
            .date_filtered()
            .columns(&[
                "name", "title", "firstname", "lastname", "email", "phone", "mobile", "company",
                "position", "address", "city", "zip", "country", "description", "account.name",
                "account.title", "user.name", "user.title", "edited", "created",
            ])
            .ref_keys(&["account.name", "user.name"])
            .build(),
        table("tickets")
            .date_filtered()
            .columns(&[
                "name", "title", "description", "stage", "priority", "sla_deadtime", "sla_change",
                "category.name", "category.title", "contact.name", "contact.title", "account.name",
                "account.title", "user.name", "user.title", "queue.name", "queue.title", "tags",
                "edited", "created",
            ])
            .ref_keys(&[
                "category.name", "contact.name", "account.name", "user.name", "queue.name",
            ])
            .list_columns(&["tags"])
            .build(),
        table("users")
            .columns(&[
                "name", "title", "firstname", "lastname", "email", "phone", "mobile", "extension",
                "alias", "role.name", "role.title", "groups", "skills", "edited", "created",
            ])
            .ref_keys(&["role.name"])
            .list_of_dicts_columns(&["groups", "skills"])
            .build(),
        table("queues")
            .columns(&[
                "name", "title", "description", "type", "strategy", "timeout", "wrapup_time",
                "max_waiting", "max_waiting_time", "edited", "created",
            ])
            .build(),
        table("campaigns")
            .columns(&[
                "name", "title", "description", "type", "status", "queue.name", "queue.title",
                "edited", "created",
            ])
            .ref_keys(&["queue.name"])
            .build(),
        table("accounts")
            .date_filtered()
            .columns(&[
                "name", "title", "description", "type", "phone", "email", "website", "address",
                "city", "zip", "country", "user.name", "user.title", "edited", "created",
            ])
            .ref_keys(&["user.name"])
            .build(),
        table("calls")
            .date_filtered()
            .columns(&[
                "name", "clid", "did", "direction", "disposition", "duration", "billsec",
                "recording", "queue.name", "queue.title", "user.name", "user.title",
                "contact.name", "contact.title", "edited", "created",
            ])
            .ref_keys(&["queue.name", "user.name", "contact.name"])
            .build(),
        table("records")
            .date_filtered()
            .columns(&[
                "name", "title", "description", "status", "contact.name", "contact.title",
                "account.name", "account.title", "user.name", "user.title", "edited", "created",
            ])
            .ref_keys(&["contact.name", "account.name", "user.name"])
            .build(),
        table("statuses")
            .columns(&["name", "title", "type", "color", "default", "edited", "created"])
            .build(),
        table("categories")
            .columns(&[
                "name", "title", "description", "type", "parent.name", "parent.title", "edited",
                "created",
            ])
            .ref_keys(&["parent.name"])
            .build(),
        table("emails")
            .date_filtered()
            .columns(&[
                "name", "subject", "from", "to", "cc", "bcc", "body", "direction", "status",
                "queue.name", "queue.title", "user.name", "user.title", "contact.name",
                "contact.title", "ticket.name", "ticket.title", "edited", "created",
            ])
            .ref_keys(&["queue.name", "user.name", "contact.name", "ticket.name"])
            .build(),
        table("chats")
            .date_filtered()
            .columns(&[
                "name", "message", "direction", "status", "queue.name", "queue.title",
                "user.name", "user.title", "contact.name", "contact.title", "edited", "created",
            ])
            .ref_keys(&["queue.name", "user.name", "contact.name"])
            .build(),
        table("sms")
            .date_filtered()
            .columns(&[
                "name", "text", "from", "to", "direction", "status", "user.name", "user.title",
                "contact.name", "contact.title", "edited", "created",
            ])
            .ref_keys(&["user.name", "contact.name"])
            .build(),
        table("devices")
            .columns(&[
                "name", "title", "type", "extension", "user.name", "user.title", "status",
                "edited", "created",
            ])
            .ref_keys(&["user.name"])
            .build(),
        table("profiles")
            .columns(&["name", "title", "description", "permissions", "edited", "created"])
            .list_of_dicts_columns(&["permissions"])
            .build(),
        table("pauses")
            .columns(&[
                "name", "title", "description", "type", "productive", "edited", "created",
            ])
            .build(),
        table("skills")
            .columns(&["name", "title", "description", "edited", "created"])
            .build(),
        table("groups")
            .columns(&["name", "title", "description", "members", "edited", "created"])
            .list_of_dicts_columns(&["members"])
            .build(),
        table("fields")
            .columns(&[
                "name", "title", "type", "entity", "required", "options", "edited", "created",
            ])
            .list_of_dicts_columns(&["options"])
            .build(),
        table("forms")
            .columns(&[
                "name", "title", "description", "type", "fields", "edited", "created",
            ])
            .list_of_dicts_columns(&["fields"])
            .build(),
        table("templates")
            .columns(&["name", "title", "type", "subject", "body", "edited", "created"])
            .build(),
        table("schedules")
            .columns(&[
                "name", "title", "description", "timezone", "rules", "edited", "created",
            ])
            .list_of_dicts_columns(&["rules"])
            .build(),
        table("holidays")
            .columns(&["name", "title", "date", "recurring", "edited", "created"])
            .build(),
        table("recordings")
            .date_filtered()
            .columns(&[
                "name", "duration", "call.name", "user.name", "user.title", "url", "edited",
                "created",
            ])
            .ref_keys(&["call.name", "user.name"])
            .build(),
        table("files")
            .date_filtered()
            .columns(&[
                "name", "title", "filename", "size", "mime", "url", "ticket.name",
                "ticket.title", "edited", "created",
            ])
            .ref_keys(&["ticket.name"])
            .build(),
        table("notes")
            .date_filtered()
            .columns(&[
                "name", "text", "user.name", "user.title", "ticket.name", "ticket.title",
                "contact.name", "contact.title", "edited", "created",
            ])
            .ref_keys(&["user.name", "ticket.name", "contact.name"])
            .build(),
        table("activities_statuses")
            .endpoint("activities_statuses")
            .columns(&[
                "name", "title", "type", "category", "color", "icon", "edited", "created",
            ])
            .build(),
        table("activities_call")
            .child_of("activities", "call", "name")
            .columns(&[
                "name", "clid", "did", "direction", "disposition", "duration", "billsec",
                "recording", "edited", "created",
            ])
            .build(),
        table("activities_email")
            .child_of("activities", "email", "name")
            .columns(&[
                "name", "subject", "from", "to", "cc", "bcc", "body", "edited", "created",
            ])
            .build(),
        table("activities_chat")
            .child_of("activities", "chat", "name")
            .columns(&["name", "message", "channel", "edited", "created"])
            .build(),
        table("activities_sms")
            .child_of("activities", "sms", "name")
            .columns(&["name", "text", "from", "to", "edited", "created"])
            .build(),
        table("tickets_categories")
            .endpoint("tickets/categories")
            .columns(&[
                "name", "title", "description", "parent.name", "parent.title", "edited",
                "created",
            ])
            .ref_keys(&["parent.name"])
            .build(),
        table("contacts_custom_fields")
            .endpoint("contacts/custom_fields")
            .columns(&["name", "title", "type", "value", "edited", "created"])
            .build(),
        table("accounts_custom_fields")
            .endpoint("accounts/custom_fields")
            .columns(&["name", "title", "type", "value", "edited", "created"])
            .build(),
        table("users_queues")
            .endpoint("users/queues")
            .natural_keys(&["user.name", "queue.name"])
            .columns(&[
                "user.name", "queue.name", "queue.title", "priority", "edited", "created",
            ])
            .ref_keys(&["user.name", "queue.name"])
            .build(),
    ]
}
