diesel::table! {
    api_calls (id) {
        id -> BigInt,
        created_at -> Timestamp,
    }
}

diesel::table! {
    stock_cache (cache_key) {
        cache_key -> Text,
        symbol -> Text,
        data_type -> Text,
        data -> Text,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    stock_names (ticker) {
        ticker -> Text,
        name_zh -> Text,
        updated_at -> Timestamp,
    }
}

diesel::allow_tables_to_appear_in_same_query!(api_calls, stock_cache, stock_names,);
