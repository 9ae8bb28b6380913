//! Diesel table definitions mirroring `backend/migrations`.
//!
//! The generated `geom` geography columns are omitted; they are only read
//! through raw SQL in proximity queries.

diesel::table! {
    /// Vaccination locations selected by the authority.
    stand_points (id) {
        id -> Uuid,
        name -> Text,
        location -> Text,
        geometry_type -> Text,
        longitude -> Float8,
        latitude -> Float8,
        number_of_user -> Int4,
        left_users -> Nullable<Int4>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Citizens who may be matched to drives.
    users (id) {
        id -> Uuid,
        name -> Text,
        email -> Text,
        mobile_number -> Nullable<Text>,
        geometry_type -> Text,
        longitude -> Float8,
        latitude -> Float8,
        is_registered -> Bool,
        stand_point_assigned -> Nullable<Uuid>,
        /// Insertion ordered; duplicates allowed.
        map_view_stand_points -> Array<Uuid>,
        is_vaccinated -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(users -> stand_points (stand_point_assigned));
diesel::allow_tables_to_appear_in_same_query!(stand_points, users);
