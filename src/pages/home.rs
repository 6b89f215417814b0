use super::{escape_html, img_tag, layout, UseCase};
use crate::assets::AssetStore;

const APPLICATIONS: [(&str, &str); 5] = [
    (
        "Accessibility",
        "Enhancing accessibility for visually impaired individuals by providing textual descriptions of images.",
    ),
    (
        "Content Management",
        "Automating the tagging and categorization of images in large databases.",
    ),
    ("E-commerce", "Enriching product listings with automatic descriptions."),
    (
        "Social Media",
        "Automatically generating captions for user-uploaded images.",
    ),
    (
        "Surveillance and Security",
        "Analyzing and describing surveillance footage.",
    ),
];

const WORKFLOW_STEPS: [(&str, &str, &str); 3] = [
    (
        "extraction.png",
        "Feature Extraction",
        "Analyzing the image to identify objects, actions, and scenes using a pre-trained CNN.",
    ),
    (
        "Context.jpg",
        "Contextual Understanding",
        "Integrating the extracted features into an RNN or transformer model to understand the \
         relationships and context within the image.",
    ),
    (
        "Example.jpg",
        "Caption Generation",
        "Producing a coherent and contextually accurate textual description based on the visual analysis.",
    ),
];

/// Card order on the home page.
const CARD_ORDER: [UseCase; 3] = [UseCase::Travel, UseCase::XRay, UseCase::Cctv];

pub async fn render_home(store: &AssetStore) -> String {
    let surf = store.image_or_placeholder("surf.jpg").await;
    let workflow = store.image_or_placeholder("workflow.png").await;

    let mut grid = String::new();
    let mut steps = String::new();
    for (file, title, text) in WORKFLOW_STEPS {
        let src = store.image_or_placeholder(file).await;
        grid.push_str(&format!(
            r#"<div class="col-span-1">{}</div>"#,
            img_tag(src.as_deref(), title, "h-80 w-full rounded-lg shadow-lg")
        ));
        steps.push_str(&format!("<li>{}: {}</li>", title, text));
    }

    let applications: String = APPLICATIONS
        .iter()
        .map(|(name, text)| format!("<li>{}: {}</li>", name, text))
        .collect();

    let mut cards = String::new();
    for case in CARD_ORDER {
        let src = store.image_or_placeholder(case.card_image()).await;
        cards.push_str(&format!(
            r#"<a class="card" href="/{slug}">{img}<h3>{title}</h3><p>{blurb}</p></a>"#,
            slug = case.slug(),
            img = img_tag(src.as_deref(), case.title(), ""),
            title = escape_html(case.title()),
            blurb = case.card_blurb(),
        ));
    }

    let body = format!(
        r#"<section class="intro">
    <h2>Image Captioning</h2>
    {surf}
    <h3>Caption: Surfer surfing the sea</h3>
    <p>Image captioning is an advanced technology that bridges the gap between computer vision
    and natural language processing. It involves generating descriptive and contextually relevant
    text captions for images, enabling machines to understand and articulate visual content in
    human language.</p>
    <h3>How Does Image Captioning Work?</h3>
    {workflow}
    <h3>Basic workflow of Image Captioning</h3>
    <p>Image captioning systems leverage deep learning models, particularly convolutional neural
    networks (CNNs) for image feature extraction and recurrent neural networks (RNNs) or
    transformers for language generation. The process involves:</p>
    <div class="grid">{grid}</div>
    <ul>{steps}</ul>
    <h3>Applications of Image Captioning</h3>
    <ul>{applications}</ul>
</section>
<section class="use-cases">
    <h2>Use Cases</h2>
    <div class="card-container">{cards}</div>
</section>"#,
        surf = img_tag(surf.as_deref(), "Sample", "h-auto mb-4 rounded-lg shadow-lg"),
        workflow = img_tag(workflow.as_deref(), "Workflow", "h-auto mb-4 rounded-lg shadow-lg"),
        grid = grid,
        steps = steps,
        applications = applications,
        cards = cards,
    );

    layout(store, "Home", None, &body).await
}
