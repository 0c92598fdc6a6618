//! Vocabulary quiz data.
//!
//! `GET /learn_for_fun/api` serves a fixed set of beginner Japanese phrases.
//! The browser quizzes on either the romaji or the kana answer.

use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub question: &'static str,
    pub answer: &'static str,
    pub alt_answer: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionSet {
    pub all_questions: Vec<Question>,
    pub title: &'static str,
    pub description: &'static str,
    pub creator_name: &'static str,
}

const QUESTIONS: &[(&str, &str, &str)] = &[
    (
        "I am very glad to meet you.",
        "Oaidekite ureshii desu",
        "おあいできて　うれしいです。",
    ),
    ("Do you speak English?", "Eigo o hanasemasu ka", "えいごをはなせますか。"),
    ("How are you?", "O-genki desu ka", "おげんきですか。"),
    ("I don't understand.", "Wakarimasen", "わかりません。"),
    (
        "I only speak a little Japanese.",
        "Watashi wa nihongo ga sukoshi shika hanasemasen.",
        "わたしは　にほんごがすこししか　はなせません。",
    ),
    (
        "My name is Kaorii.",
        "Watashi no namae wa Kaori desu.",
        "わたしのなまえは　かおりです。",
    ),
    ("Long time, no see!", "Hisashiburi", "久しぶり。"),
    ("See you later/Goodbye", "Ja Mata", "じゃまた。"),
];

pub fn japanese_vocabulary() -> QuestionSet {
    QuestionSet {
        all_questions: QUESTIONS
            .iter()
            .map(|&(question, answer, alt_answer)| Question {
                question,
                answer,
                alt_answer,
            })
            .collect(),
        title: "Japanese vocabulary",
        description: "Beginner japanese vocabulary. With or without romaji.",
        creator_name: "Eric Jansson",
    }
}

pub fn router() -> Router {
    Router::new().route(
        "/learn_for_fun/api",
        get(|| async { Json(japanese_vocabulary()) }),
    )
}
