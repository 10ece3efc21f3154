//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Care-seeking user accounts.
    users (id) {
        id -> Uuid,
        /// Login name, unique among users.
        user_name -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Varchar,
        name -> Varchar,
        foto -> Nullable<Varchar>,
        verificado -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Nurse accounts and their public profile.
    nurses (id) {
        id -> Uuid,
        /// Login name, unique among nurses.
        user_name -> Varchar,
        password_hash -> Varchar,
        name -> Varchar,
        fecha_nacimiento -> Varchar,
        genero -> Varchar,
        descripcion -> Nullable<Text>,
        especialidad -> Varchar,
        ubicacion -> Varchar,
        tarifa -> Float8,
        /// JSON array of `{dia, horaInicio, horaFin}` slots.
        disponibilidad -> Jsonb,
        certificados -> Array<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    patients (id) {
        id -> Uuid,
        /// Owning user.
        usuario_id -> Uuid,
        name -> Varchar,
        fecha_nacimiento -> Varchar,
        genero -> Varchar,
        movilidad -> Varchar,
        descripcion -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Service requests and their lifecycle state.
    service_requests (id) {
        id -> Uuid,
        user_id -> Uuid,
        nurse_id -> Uuid,
        patient_ids -> Array<Uuid>,
        /// One of `pendiente`, `en_progreso`, `completado`.
        estado -> Varchar,
        detalles -> Text,
        fecha -> Timestamptz,
        tarifa -> Float8,
        pago_realizado -> Bool,
        pago_liberado -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    messages (id) {
        id -> Uuid,
        service_request_id -> Uuid,
        sender_id -> Uuid,
        receiver_id -> Uuid,
        content -> Text,
        /// Ordering key for history pages.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One review per user and service request.
    reviews (id) {
        id -> Uuid,
        user_id -> Uuid,
        nurse_id -> Uuid,
        service_request_id -> Uuid,
        calificacion -> Int2,
        comentario -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Simulated payments; at most one per service request.
    transactions (id) {
        id -> Uuid,
        nurse_id -> Uuid,
        user_id -> Uuid,
        service_request_id -> Uuid,
        monto -> Float8,
        fecha_pago -> Timestamptz,
        estado -> Varchar,
    }
}

diesel::table! {
    support_requests (id) {
        id -> Uuid,
        user_id -> Uuid,
        tipo_usuario -> Varchar,
        asunto -> Varchar,
        mensaje -> Text,
        estado -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    faqs (id) {
        id -> Uuid,
        pregunta -> Text,
        respuesta -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(messages -> service_requests (service_request_id));
diesel::joinable!(reviews -> service_requests (service_request_id));
diesel::joinable!(transactions -> service_requests (service_request_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    nurses,
    patients,
    service_requests,
    messages,
    reviews,
    transactions,
    support_requests,
    faqs,
);
