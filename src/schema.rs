diesel::table! {
    users (id) {
        id -> Integer,
        email -> Text,
        password -> Text,
        age -> Nullable<Integer>,
        zipcode -> Nullable<Text>,
        created_at -> Timestamp,
    }
}

diesel::table! {
    movies (id) {
        id -> Integer,
        title -> Text,
        released -> Nullable<Text>,
        imdb_url -> Nullable<Text>,
    }
}

diesel::table! {
    ratings (id) {
        id -> Integer,
        user_id -> Integer,
        movie_id -> Integer,
        score -> Integer,
    }
}

diesel::joinable!(ratings -> users (user_id));
diesel::joinable!(ratings -> movies (movie_id));

diesel::allow_tables_to_appear_in_same_query!(users, movies, ratings,);
