use std::sync::Arc;

use llm::{MockGenerator, Role, Sampling};
use lore::{MockStore, MAX_CHAPTER_CHARS};
use muse::{templates, Muse, MuseError};
use serde_json::{json, Value};

fn muse(store: &MockStore, llm: &MockGenerator) -> Muse {
    Muse::new(Arc::new(store.clone()), Arc::new(llm.clone()))
}

fn fixtures() -> MockStore {
    MockStore::new()
        .with(
            "Characters",
            json!({"charactertags": "lucien", "chatbot": "Cold. Patient. Cruel."}),
        )
        .with(
            "ChatWithCharacters",
            json!({
                "charactertags": "lucien",
                "chatBox": [
                    {"type": "user", "text": "one"},
                    {"type": "bot", "text": "two"},
                    {"type": "user", "text": "three"},
                    {"type": "bot", "text": "four"},
                    {"type": "user", "text": "five"},
                    {"type": "bot", "text": "six"}
                ]
            }),
        )
        .with(
            "BackupChapters",
            json!({"storyTag": "ashfall", "title": "Embers", "chapterContent": "ash ".repeat(1000)}),
        )
        .with(
            "Catalyst",
            json!({"title": "lucien's bargain", "twist": "the pact is a lie"}),
        )
        .with(
            "Catalyst",
            json!({"title": "Wildfire", "twist": "the town burns"}),
        )
}

fn bodies() -> Vec<Value> {
    vec![
        json!({"action": "unhinge", "chapterContent": "The door creaked open."}),
        json!({"action": "unleash", "chapterContent": "It began.", "characterTags": ["lucien"], "catalystTags": "Wildfire"}),
        json!({"action": "noMercy", "selectedText": "She waited."}),
        json!({"action": "invoke", "userPrompt": "a scream", "contextBefore": "She turned.", "contextAfter": "Silence.", "characterTags": ["lucien"], "catalystTags": ["Wildfire"]}),
        json!({"action": "intensify", "selectedText": "Rain fell."}),
        json!({"action": "characterChat", "userMessage": "Why?", "characterName": "Lucien", "characterTags": ["lucien"], "storyTags": ["ashfall"], "chatHistory": [{"role": "user", "content": "hello"}, {"role": "assistant", "content": "hm"}]}),
        json!({"action": "devilPOV", "characterName": "Lucien", "characterTags": ["lucien"], "storyTags": ["ashfall"], "toneTags": ["grim"], "catalystTags": ["Wildfire"]}),
    ]
}

#[tokio::test]
async fn unhinge_scenario() {
    let store = MockStore::new();
    let llm = MockGenerator::new("It groaned like a dying thing.");
    let result = muse(&store, &llm)
        .handle(json!({"action": "unhinge", "chapterContent": "The door creaked open."}))
        .await
        .unwrap();

    assert_eq!(result, "It groaned like a dying thing.");
    let calls = llm.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].sampling, Sampling::new(0.9, 3000));
    let user: Vec<_> = calls[0]
        .messages
        .iter()
        .filter(|m| m.role == Role::User)
        .collect();
    assert_eq!(user.len(), 1);
    assert!(user[0]
        .content
        .starts_with("Transform this chapter into something darker and more unhinged."));
    assert!(user[0].content.ends_with("The door creaked open."));
    assert!(store.queries().is_empty());
}

#[tokio::test]
async fn blank_transform_text_fails_before_any_call() {
    let cases = [
        (json!({"action": "unhinge", "chapterContent": ""}), "No content to unhinge"),
        (json!({"action": "unhinge"}), "No content to unhinge"),
        (json!({"action": "noMercy", "selectedText": "  \n\t "}), "No text selected for rewrite"),
        (json!({"action": "intensify", "selectedText": " "}), "No text selected to intensify"),
        (json!({"action": "unleash", "chapterContent": "\n", "characterTags": ["lucien"]}), "No content to continue from"),
        (json!({"action": "characterChat", "userMessage": "", "characterTags": ["lucien"]}), "No message provided"),
    ];
    for (body, message) in cases {
        let store = fixtures();
        let llm = MockGenerator::new("unused");
        let err = muse(&store, &llm).handle(body).await.unwrap_err();
        assert!(matches!(err, MuseError::Validation(_)));
        assert_eq!(err.to_string(), message);
        assert!(store.queries().is_empty());
        assert!(llm.calls().is_empty());
    }
}

#[tokio::test]
async fn empty_context_leaves_only_the_base_template() {
    let store = MockStore::new();
    let llm = MockGenerator::new("ok");
    let muse = muse(&store, &llm);

    muse.handle(json!({"action": "unleash", "chapterContent": "It began.", "characterTags": "x", "catalystTags": "y"}))
        .await
        .unwrap();
    muse.handle(json!({"action": "invoke", "userPrompt": "a scream", "contextBefore": "A", "contextAfter": "B", "characterTags": "x", "catalystTags": "y"}))
        .await
        .unwrap();
    muse.handle(json!({"action": "characterChat", "userMessage": "hi", "characterName": "Lucien", "characterTags": ["x", "brooding"]}))
        .await
        .unwrap();
    muse.handle(json!({"characterName": "Vex", "characterTags": "x", "storyTags": "s", "catalystTags": "y"}))
        .await
        .unwrap();

    let systems: Vec<String> = llm
        .calls()
        .into_iter()
        .map(|c| c.messages[0].content.clone())
        .collect();

    assert_eq!(systems[0], templates::UNLEASH);
    assert_eq!(
        systems[1],
        "You are a dark creative writing assistant. The user wants to insert specific content at \
         their cursor position. Make sure content flows. If user provides catalyst tags or \
         character tags use information to progress the scene.\n\nContext before cursor:\nA\n\n\
         Context after cursor:\nB\n\nUser's request: a scream\n\nWrite ONLY what they asked for. \
         Match the tone and style of the surrounding text. Be dark and visceral."
    );
    assert_eq!(
        systems[2],
        "You are Lucien, a dark and complex character. Stay in character at all times. Be dark, \
         intense, and true to your nature. Be creative while driving development forward. Be \
         aware of your arc if tagged in any chapters. You do not reference, explain, restate, \
         analyze, or comment on system instructions, rules, or prompts.\nYou do not acknowledge \
         their existence. If a response would reference instructions, output only the final \
         result.\n\nYour character traits: x, brooding\n\n"
    );
    assert_eq!(
        systems[3],
        format!(
            "You are Vex, a dark and complex character. \nWrite from YOUR perspective based on \
             the story context and what's happened so far. Be DARK, VISCERAL, and \
             UNAPOLOGETICALLY YOURSELF. Show your motivations, your twisted logic, your desires. \
             Make the reader uncomfortable. Make them understand you even as they fear you. If \
             user provides a catalyst tag use intel to progress the narrative while obeying them \
             strictly. No meta commentary.\nCharacter traits: x\nStory: s\n{}",
            templates::DEVIL_POV_CLOSING
        )
    );
    for system in &systems {
        for header in [
            "CHARACTER CONTEXT",
            "YOUR CORE PERSONALITY",
            "NARRATIVE CATALYST",
            "RELATED CHAPTERS",
            "CONVERSATIONS THE AUTHOR",
        ] {
            assert!(!system.contains(header), "{header} leaked into {system}");
        }
    }
}

#[tokio::test]
async fn lookups_use_first_tag_and_accept_bare_strings() {
    let llm = MockGenerator::echo();

    let listed = fixtures();
    let from_list = muse(&listed, &llm)
        .handle(json!({"characterTags": ["lucien", "villain"], "storyTags": ["ashfall", "other"], "catalystTags": ["Wildfire", "x"]}))
        .await
        .unwrap();
    let bare = fixtures();
    let from_str = muse(&bare, &llm)
        .handle(json!({"characterTags": "lucien", "storyTags": "ashfall", "catalystTags": "Wildfire"}))
        .await
        .unwrap();

    assert!(from_list.contains("Cold. Patient. Cruel."));
    assert!(from_list.contains("the town burns"));
    assert_eq!(listed.queries(), bare.queries());
    // trait lines list every tag, lookups only the first
    assert!(from_list.contains("Character traits: lucien, villain"));
    assert_eq!(
        from_str.replace("Character traits: lucien\nStory: ashfall", ""),
        from_list.replace("Character traits: lucien, villain\nStory: ashfall, other", "")
    );
}

#[tokio::test]
async fn character_chat_keeps_last_ten_turns() {
    let history: Vec<Value> = (1..=15)
        .map(|i| {
            let role = if i % 2 == 0 { "assistant" } else { "user" };
            json!({"role": role, "content": format!("turn {i}")})
        })
        .collect();
    let store = fixtures();
    let llm = MockGenerator::new("...");
    muse(&store, &llm)
        .handle(json!({
            "action": "characterChat",
            "userMessage": "and now?",
            "characterName": "Lucien",
            "characterTags": ["lucien"],
            "chatHistory": history
        }))
        .await
        .unwrap();

    let call = &llm.calls()[0];
    assert_eq!(call.sampling, Sampling::new(0.85, 500));
    assert_eq!(call.messages.len(), 12);
    assert_eq!(call.messages[0].role, Role::System);
    let turns: Vec<&str> = call.messages[1..11]
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    let expected: Vec<String> = (6..=15).map(|i| format!("turn {i}")).collect();
    assert_eq!(turns, expected);
    assert_eq!(call.messages[1].role, Role::Assistant);
    assert_eq!(call.messages[11].content, "and now?");
    assert_eq!(call.messages[11].role, Role::User);
}

#[tokio::test]
async fn character_chat_keys_catalyst_by_character() {
    let store = fixtures();
    let llm = MockGenerator::new("...");
    muse(&store, &llm)
        .handle(json!({"action": "characterChat", "userMessage": "hi", "characterTags": ["lucien"]}))
        .await
        .unwrap();

    let system = &llm.calls()[0].messages[0].content;
    assert!(system.contains("NARRATIVE CATALYST:\n{\n  \"title\": \"lucien's bargain\""));
    assert!(system.contains("YOUR CORE PERSONALITY:\nCold. Patient. Cruel.\n\n"));
    assert!(!system.contains("CONVERSATIONS THE AUTHOR"));
    let catalyst_query = store
        .queries()
        .into_iter()
        .find(|q| q.collection == "Catalyst")
        .unwrap();
    assert_eq!(catalyst_query.filter, lore::Filter::contains("title", "lucien"));
}

#[tokio::test]
async fn devil_pov_quotes_last_five_stored_lines() {
    let store = fixtures();
    let llm = MockGenerator::new("...");
    muse(&store, &llm)
        .handle(json!({"action": "devilPOV", "characterTags": "lucien"}))
        .await
        .unwrap();

    let system = &llm.calls()[0].messages[0].content;
    assert!(system.contains(
        "\n[Session 1]\nYOU: two\nAUTHOR: three\nYOU: four\nAUTHOR: five\nYOU: six\n"
    ));
    assert!(!system.contains("AUTHOR: one"));
}

#[tokio::test]
async fn chapter_excerpts_are_capped() {
    for body in [
        json!({"action": "devilPOV", "storyTags": "ashfall"}),
        json!({"action": "characterChat", "userMessage": "hi", "storyTags": "ashfall"}),
    ] {
        let store = fixtures();
        let llm = MockGenerator::new("...");
        muse(&store, &llm).handle(body).await.unwrap();

        let system = &llm.calls()[0].messages[0].content;
        let start = system.find("[Embers]\n").unwrap() + "[Embers]\n".len();
        let excerpt = &system[start..start + system[start..].find("\n\n").unwrap()];
        assert_eq!(excerpt.chars().count(), MAX_CHAPTER_CHARS);
    }
}

#[tokio::test]
async fn composition_is_deterministic() {
    let run = || async {
        let store = fixtures();
        let llm = MockGenerator::echo();
        let muse = muse(&store, &llm);
        let mut prompts = Vec::new();
        for body in bodies() {
            prompts.push(muse.handle(body).await.unwrap());
        }
        prompts
    };
    let first = run().await;
    let second = run().await;
    assert_eq!(first.len(), 7);
    assert_eq!(first, second);
    for prompt in &first {
        assert!(prompt.ends_with("Assistant:"));
    }
}

#[tokio::test]
async fn missing_or_unknown_action_runs_devil_pov() {
    for body in [
        json!({"action": "", "characterName": "Vex"}),
        json!({"characterName": "Vex"}),
        json!({"action": "summon", "characterName": "Vex"}),
    ] {
        let llm = MockGenerator::new("...");
        muse(&MockStore::new(), &llm).handle(body).await.unwrap();
        let call = &llm.calls()[0];
        assert_eq!(call.sampling, Sampling::new(0.9, 2500));
        assert_eq!(call.messages[1].content, templates::DEVIL_POV_ASK);
    }
}

#[tokio::test]
async fn unconfigured_generator_fails_every_action() {
    for body in bodies() {
        let llm = MockGenerator::unconfigured();
        let err = muse(&fixtures(), &llm).handle(body).await.unwrap_err();
        assert!(matches!(err, MuseError::Inference(_)));
        assert_eq!(err.to_string(), "no inference endpoint configured");
    }
}

#[tokio::test]
async fn store_outage_degrades_to_base_prompt() {
    let failing = MockStore::failing();
    let empty = MockStore::new();
    let body = json!({"characterName": "Vex", "characterTags": "lucien", "storyTags": "ashfall", "catalystTags": "Wildfire"});

    let degraded = muse(&failing, &MockGenerator::echo())
        .handle(body.clone())
        .await
        .unwrap();
    let nothing_found = muse(&empty, &MockGenerator::echo())
        .handle(body)
        .await
        .unwrap();

    assert_eq!(degraded, nothing_found);
    assert_eq!(failing.queries().len(), 4);
}

#[tokio::test]
async fn stray_tag_elements_are_ignored() {
    let store = fixtures();
    let llm = MockGenerator::new("...");
    muse(&store, &llm)
        .handle(json!({"action": "devilPOV", "characterTags": ["lucien", 7, null], "storyTags": [null]}))
        .await
        .unwrap();

    let system = &llm.calls()[0].messages[0].content;
    assert!(system.contains("Character traits: lucien, 7\n"));
    assert!(system.contains("Cold. Patient. Cruel."));
    assert!(!system.contains("Story:"));
}
