use maud::{DOCTYPE, Markup, html};

use crate::models::Movie;

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";
const STYLESHEET: &str = "/css/style.css";

pub fn index_page(movies: &[Movie]) -> String {
    page(
        "Movies",
        html! {
            div class="max-w-4xl mx-auto px-6 py-10" {
                div class="flex items-start justify-between gap-6" {
                    h1 class="text-3xl font-bold text-gray-900" { "Movies" }
                    a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href="/add" { "Add a movie" }
                }

                @if movies.is_empty() {
                    div class="mt-10 bg-white shadow rounded-lg p-8" {
                        p class="text-gray-600" { "No movies yet." }
                    }
                } @else {
                    div class="mt-10 grid gap-4 md:grid-cols-2" {
                        @for movie in movies {
                            (movie_card(movie))
                        }
                    }
                }
            }
        },
    )
}

pub fn movie_page(movie: &Movie) -> String {
    page(
        &movie.title,
        html! {
            div class="max-w-2xl mx-auto px-6 py-12" {
                div class="bg-white shadow rounded-lg p-8 movie" {
                    @if let Some(poster) = &movie.poster {
                        img class="w-48 rounded" src=(poster) alt=(movie.title);
                    }
                    h1 class="mt-6 text-3xl font-bold text-gray-900" { (movie.title) }
                    dl class="mt-4 space-y-2 text-gray-700" {
                        div {
                            dt class="inline font-medium" { "Released: " }
                            dd class="inline" { (movie.released.as_deref().unwrap_or("Unknown")) }
                        }
                        div {
                            dt class="inline font-medium" { "Metascore: " }
                            dd class="inline" {
                                @match movie.metascore {
                                    Some(score) => { (score) }
                                    None => { "N/A" }
                                }
                            }
                        }
                    }
                    (movie_actions(movie))
                    a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                }
            }
        },
    )
}

pub fn add_movie_page() -> String {
    page(
        "Add a Movie",
        html! {
            div class="max-w-2xl mx-auto px-6 py-12" {
                div class="bg-white shadow rounded-lg p-8" {
                    h1 class="text-3xl font-bold text-gray-900" { "Add a Movie" }
                    (movie_form("/", None, "Add"))
                }
            }
        },
    )
}

pub fn edit_movie_page(movie: &Movie) -> String {
    page(
        &format!("Edit {}", movie.title),
        html! {
            div class="max-w-2xl mx-auto px-6 py-12" {
                div class="bg-white shadow rounded-lg p-8" {
                    h1 class="text-3xl font-bold text-gray-900" { "Edit Movie" }
                    (movie_form(&format!("/movies/{}", movie.id), Some(movie), "Save"))
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
                link rel="stylesheet" href=(STYLESHEET);
            }
            body class="min-h-screen bg-gray-50" { (body) }
        }
    }
    .into_string()
}

fn movie_card(movie: &Movie) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg p-6 movie" {
            div class="flex items-start gap-4" {
                @if let Some(poster) = &movie.poster {
                    img class="w-20 rounded" src=(poster) alt=(movie.title);
                }
                div {
                    a class="text-xl font-semibold text-gray-900 hover:text-blue-700" href=(format!("/movies/{}", movie.id)) {
                        (movie.title)
                    }
                    @if let Some(released) = &movie.released {
                        p class="mt-1 text-sm text-gray-500" { (released) }
                    }
                    (movie_actions(movie))
                }
            }
        }
    }
}

fn movie_actions(movie: &Movie) -> Markup {
    html! {
        div class="mt-4 flex gap-4 text-sm" {
            a class="text-blue-600 hover:text-blue-800" href=(format!("/movies/edit/{}", movie.id)) { "Edit" }
            a class="text-red-600 hover:text-red-800" href=(format!("/movies/delete/{}", movie.id)) { "Delete" }
        }
    }
}

fn movie_form(action: &str, movie: Option<&Movie>, submit: &str) -> Markup {
    let title = movie.map(|m| m.title.as_str()).unwrap_or_default();
    let poster = movie.and_then(|m| m.poster.as_deref()).unwrap_or_default();
    let released = movie.and_then(|m| m.released.as_deref()).unwrap_or_default();
    let metascore = movie.and_then(|m| m.metascore).map(|s| s.to_string()).unwrap_or_default();

    html! {
        form class="mt-8 space-y-6" method="post" action=(action) {
            (text_field("Title", "Title", title, true))
            (text_field("Poster", "Poster URL", poster, false))
            (text_field("Released", "Released", released, false))
            div {
                label class="block text-sm font-medium text-gray-700" for="Metascore" { "Metascore" }
                input class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" type="number" step="any" name="Metascore" id="Metascore" value=(metascore);
            }
            button class="w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { (submit) }
        }
    }
}

fn text_field(name: &str, label: &str, value: &str, required: bool) -> Markup {
    html! {
        div {
            label class="block text-sm font-medium text-gray-700" for=(name) { (label) }
            input class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" name=(name) id=(name) value=(value) required[required];
        }
    }
}
