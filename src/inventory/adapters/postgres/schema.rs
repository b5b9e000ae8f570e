//! Diesel schema for inventory persistence.

diesel::table! {
    /// Attributes keyed by `(property, value)`.
    attributes (id) {
        /// Attribute identifier.
        id -> Uuid,
        /// Property prefix.
        #[max_length = 50]
        property -> Varchar,
        /// Attribute value.
        #[max_length = 1024]
        value -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// `sync` or `tag`.
        #[max_length = 10]
        kind -> Varchar,
        /// Computer identified by a `CID` attribute.
        identifies -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// Managed computers.
    computers (id) {
        /// Computer identifier.
        id -> Uuid,
        /// Computer name.
        #[max_length = 255]
        name -> Varchar,
        /// Project the computer runs.
        project_id -> Uuid,
        /// Administrative status.
        #[max_length = 20]
        status -> Varchar,
    }
}

diesel::table! {
    /// Attribute memberships of computers.
    computer_attributes (computer_id, attribute_id, membership) {
        /// Owning computer.
        computer_id -> Uuid,
        /// Carried attribute.
        attribute_id -> Uuid,
        /// `sync` or `tag`.
        #[max_length = 10]
        membership -> Varchar,
    }
}

diesel::table! {
    /// Attribute sets with their filters.
    attribute_sets (id) {
        /// Set identifier.
        id -> Uuid,
        /// Set name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Whether the set is evaluated.
        enabled -> Bool,
        /// Representative `SET` attribute.
        attribute_id -> Uuid,
        /// Included and excluded attributes.
        filter -> Jsonb,
    }
}

diesel::joinable!(computer_attributes -> computers (computer_id));
diesel::joinable!(computer_attributes -> attributes (attribute_id));
diesel::allow_tables_to_appear_in_same_query!(
    attributes,
    computers,
    computer_attributes,
    attribute_sets,
);
