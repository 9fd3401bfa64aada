use crate::auth::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Number,
    Date,
    LongText,
    Role,
    Password,
    Image,
}

impl FieldKind {
    pub fn input_type(&self) -> &'static str {
        match self {
            FieldKind::Text | FieldKind::Role | FieldKind::LongText => "text",
            FieldKind::Email => "email",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Password => "password",
            FieldKind::Image => "file",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind, required: bool) -> Field {
    Field {
        name,
        label,
        kind,
        required,
    }
}

/// A backend-owned record collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Properties,
    Houses,
    Cabuy,
    Surveys,
    CrmLogs,
    Members,
}

const PROPERTY_FIELDS: &[Field] = &[
    field("name", "Name", FieldKind::Text, true),
    field("location", "Location", FieldKind::Text, true),
    field("description", "Description", FieldKind::LongText, false),
    field("image", "Image", FieldKind::Image, false),
];

const HOUSE_FIELDS: &[Field] = &[
    field("property_id", "Property ID", FieldKind::Number, true),
    field("type", "Type", FieldKind::Text, true),
    field("block", "Block", FieldKind::Text, false),
    field("price", "Price", FieldKind::Number, true),
    field("status", "Status", FieldKind::Text, false),
    field("image", "Image", FieldKind::Image, false),
];

const CABUY_FIELDS: &[Field] = &[
    field("name", "Name", FieldKind::Text, true),
    field("phone", "Phone", FieldKind::Text, true),
    field("email", "Email", FieldKind::Email, false),
    field("source", "Source", FieldKind::Text, false),
    field("status", "Status", FieldKind::Text, false),
];

const SURVEY_FIELDS: &[Field] = &[
    field("cabuy_id", "Cabuy ID", FieldKind::Number, true),
    field("property_id", "Property ID", FieldKind::Number, true),
    field("date", "Date", FieldKind::Date, true),
    field("notes", "Notes", FieldKind::LongText, false),
];

const CRM_LOG_FIELDS: &[Field] = &[
    field("cabuy_id", "Cabuy ID", FieldKind::Number, true),
    field("activity", "Activity", FieldKind::Text, true),
    field("date", "Date", FieldKind::Date, true),
    field("notes", "Notes", FieldKind::LongText, false),
];

const MEMBER_FIELDS: &[Field] = &[
    field("name", "Name", FieldKind::Text, true),
    field("email", "Email", FieldKind::Email, true),
    field("password", "Password", FieldKind::Password, true),
    field("role", "Role", FieldKind::Role, true),
    field("leader_id", "Leader ID", FieldKind::Number, false),
    field("phone", "Phone", FieldKind::Text, false),
];

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Properties,
        Resource::Houses,
        Resource::Cabuy,
        Resource::Surveys,
        Resource::CrmLogs,
        Resource::Members,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Resource::Properties => "properties",
            Resource::Houses => "houses",
            Resource::Cabuy => "cabuy",
            Resource::Surveys => "surveys",
            Resource::CrmLogs => "crm-logs",
            Resource::Members => "members",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.slug() == slug)
    }

    /// Backend collection path, relative to the API base.
    pub fn api_path(&self) -> &'static str {
        self.slug()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Resource::Properties => "Properties",
            Resource::Houses => "Houses",
            Resource::Cabuy => "Cabuy",
            Resource::Surveys => "Surveys",
            Resource::CrmLogs => "CRM Logs",
            Resource::Members => "Members",
        }
    }

    pub fn fields(&self) -> &'static [Field] {
        match self {
            Resource::Properties => PROPERTY_FIELDS,
            Resource::Houses => HOUSE_FIELDS,
            Resource::Cabuy => CABUY_FIELDS,
            Resource::Surveys => SURVEY_FIELDS,
            Resource::CrmLogs => CRM_LOG_FIELDS,
            Resource::Members => MEMBER_FIELDS,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn accepts_image(&self) -> bool {
        self.fields().iter().any(|f| f.kind == FieldKind::Image)
    }

    /// Collections offered in a role's portal.
    pub fn for_role(role: Role) -> &'static [Resource] {
        match role {
            Role::Admin => &[
                Resource::Properties,
                Resource::Houses,
                Resource::Members,
                Resource::Cabuy,
                Resource::Surveys,
                Resource::CrmLogs,
            ],
            Role::SeniorLeader | Role::Leader => &[
                Resource::Members,
                Resource::Cabuy,
                Resource::Surveys,
                Resource::CrmLogs,
            ],
            Role::Member => &[Resource::Cabuy, Resource::Surveys, Resource::CrmLogs],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_round_trip() {
        for resource in Resource::ALL {
            assert_eq!(Resource::from_slug(resource.slug()), Some(resource));
        }
        assert_eq!(Resource::from_slug("tenants"), None);
    }

    #[test]
    fn only_property_and_house_accept_images() {
        let with_images: Vec<_> = Resource::ALL.into_iter().filter(Resource::accepts_image).collect();
        assert_eq!(with_images, vec![Resource::Properties, Resource::Houses]);
    }

    #[test]
    fn members_portal_has_no_inventory_or_member_admin() {
        let member = Resource::for_role(Role::Member);
        assert!(!member.contains(&Resource::Properties));
        assert!(!member.contains(&Resource::Members));
        assert!(Resource::for_role(Role::Admin).contains(&Resource::Houses));
    }
}
