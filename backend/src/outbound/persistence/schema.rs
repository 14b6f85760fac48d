//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// One gift-exchange session; `code` is the user-facing identifier.
    exchanges (code) {
        code -> Int8,
        creator_contact -> Text,
        /// `open` or `closed`.
        status -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Members of an exchange, in join order by `id`.
    participants (id) {
        id -> Int8,
        exchange_code -> Int8,
        name -> Text,
        contact -> Text,
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    /// Committed draw: one row per giver.
    pairings (exchange_code, giver_id) {
        exchange_code -> Int8,
        giver_id -> Int8,
        receiver_id -> Int8,
    }
}

diesel::joinable!(participants -> exchanges (exchange_code));
diesel::joinable!(pairings -> exchanges (exchange_code));

diesel::allow_tables_to_appear_in_same_query!(exchanges, participants, pairings);
