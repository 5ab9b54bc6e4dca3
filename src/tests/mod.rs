mod common;
mod endpoint_movies;
