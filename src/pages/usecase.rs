//! The X-ray, travel guide and CCTV pages.

use super::{data_table, escape_html, img_tag, layout, metrics_table, unavailable};
use crate::assets::{load_columns, AssetStore};

/// A row of a page's precomputed evaluation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metric {
    pub metric: &'static str,
    pub value: &'static str,
}

const fn metric(metric: &'static str, value: &'static str) -> Metric {
    Metric { metric, value }
}

pub const XRAY_METRICS: [Metric; 4] = [
    metric("Accuracy", "85%"),
    metric("Precision", "82%"),
    metric("Recall", "88%"),
    metric("F1 Score", "85%"),
];

pub const TRAVEL_METRICS: [Metric; 4] = [
    metric("Accuracy", "90%"),
    metric("Precision", "88%"),
    metric("Recall", "92%"),
    metric("F1 Score", "90%"),
];

pub const CCTV_METRICS: [Metric; 4] = [
    metric("Accuracy", "87%"),
    metric("Precision", "85%"),
    metric("Recall", "89%"),
    metric("F1 Score", "86%"),
];

pub const TRAIN_CAPTIONS_CSV: &str = "train_caption_df.csv";
pub const TEST_PREPROCESSED_CSV: &str = "test_preprocessed_df.csv";

/// Column picks from the training captions file.
const UNPROCESSED_COLUMNS: [usize; 2] = [1, 2];
const PROCESSED_COLUMNS: [usize; 2] = [2, 3];

const IMAGE_PREPROCESSING: &str = "Image preprocessing techniques include resizing, normalization, \
    and augmentation to enhance the quality and consistency of input images for the captioning model.";

const TEXT_PREPROCESSING_SNIPPET: &str = r#"# Function to preprocess text by cleaning and normalizing
def preprocess_text(text):
    text = text.lower()
    text = re.sub(r'http\S+|www\S+|ftp\S+', '', text) # removing the links
    text = text.replace('\\n', ' ') # removing the new lines
    text = re.sub(r'\w*\d\w*', '', text) # removing the words containing numbers
    text = re.sub(r'\s+', ' ', text).strip() # removing the spaces
    text = re.sub(r'[^\w\s]', '', text) # removing special characters
    words = text.split()
    stop_words = set(stopwords.words('english'))
    words = [word for word in words if word not in stop_words] # considering only normal words
    stemmer = PorterStemmer()
    words = [stemmer.stem(word) for word in words] # considering the stemmed words
    lemmatizer = WordNetLemmatizer()
    words = [lemmatizer.lemmatize(word) for word in words] #considering the lemmatized words
    text = ' '.join(words)
    return text"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseCase {
    XRay,
    Travel,
    Cctv,
}

impl UseCase {
    /// Sidebar order.
    pub const ALL: [UseCase; 3] = [UseCase::XRay, UseCase::Travel, UseCase::Cctv];

    pub fn slug(self) -> &'static str {
        match self {
            UseCase::XRay => "xray",
            UseCase::Travel => "travel",
            UseCase::Cctv => "cctv",
        }
    }

    #[cfg(test)]
    fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }

    pub fn title(self) -> &'static str {
        match self {
            UseCase::XRay => "X-Ray Captioning",
            UseCase::Travel => "Travel Guide",
            UseCase::Cctv => "CCTV Analysis",
        }
    }

    pub fn metrics(self) -> &'static [Metric] {
        match self {
            UseCase::XRay => &XRAY_METRICS,
            UseCase::Travel => &TRAVEL_METRICS,
            UseCase::Cctv => &CCTV_METRICS,
        }
    }

    /// Only the X-ray page runs the captioning model.
    pub fn offers_captioning(self) -> bool {
        matches!(self, UseCase::XRay)
    }

    /// Image shown on the home page card.
    pub fn card_image(self) -> &'static str {
        match self {
            UseCase::XRay => "xray.jpg",
            UseCase::Travel => "travel-guide.jpg",
            UseCase::Cctv => "cctv1.jpg",
        }
    }

    pub fn card_blurb(self) -> &'static str {
        match self {
            UseCase::XRay => "Generating detailed and accurate captions for medical x-ray images, \
                aiding in diagnostic processes and medical reporting.",
            UseCase::Travel => "Automatically describing landmarks and scenic spots in travel photos, \
                enriching travel guides and blogs with informative captions.",
            UseCase::Cctv => "Analyzing CCTV camera footage to detect and describe activities and \
                events, enhancing security monitoring and incident response.",
        }
    }

    fn overview(self) -> &'static str {
        match self {
            UseCase::XRay => "X-ray captioning involves generating descriptive captions for medical \
                X-ray images to aid in diagnostic processes and medical reporting.",
            UseCase::Travel => "Travel guide captioning involves automatically describing landmarks \
                and scenic spots in travel photos, enriching travel guides and blogs with informative captions.",
            UseCase::Cctv => "CCTV analysis involves analyzing and describing activities and events \
                in CCTV footage, enhancing security monitoring and incident response.",
        }
    }

    fn data_preprocessing(self) -> String {
        let subject = match self {
            UseCase::XRay => "X-ray images",
            UseCase::Travel => "travel images",
            UseCase::Cctv => "CCTV footage",
        };
        format!(
            "Data preprocessing steps involve cleaning and preparing the {} and associated text \
             data for model training.",
            subject
        )
    }

    fn metrics_description(self) -> &'static str {
        match self {
            UseCase::XRay => "The table below shows the performance metrics of the X-ray captioning model.",
            UseCase::Travel => {
                "The table below shows the performance metrics of the travel guide captioning model."
            }
            UseCase::Cctv => "The table below shows the performance metrics of the CCTV analysis model.",
        }
    }
}

/// Renders a use-case page. Assets are read only for the page requested.
pub async fn render_use_case(store: &AssetStore, case: UseCase, max_table_rows: usize) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        "<section><h2>Overview</h2><p>{}</p>",
        case.overview()
    ));
    if case == UseCase::XRay {
        let sample = store.image_or_placeholder(case.card_image()).await;
        body.push_str(&img_tag(sample.as_deref(), "Sample", "h-auto mb-4 rounded-lg shadow-lg"));
    }
    body.push_str("</section>");

    body.push_str(&format!(
        "<section><h2>Data Preprocessing</h2><p>{}</p>",
        case.data_preprocessing()
    ));
    if case == UseCase::XRay {
        body.push_str(&xray_dataframes(store, max_table_rows).await);
    }
    body.push_str("</section>");

    body.push_str(&format!(
        "<section><h2>Image Preprocessing</h2><p>{}</p>",
        IMAGE_PREPROCESSING
    ));
    if case == UseCase::XRay {
        body.push_str("<h3>Processed Images &amp; Captions data</h3>");
        body.push_str(&match store.table(TEST_PREPROCESSED_CSV).await {
            Ok(table) => data_table(&table, max_table_rows),
            Err(e) => {
                tracing::warn!(error = %e, "dataframe unavailable");
                unavailable("Processed images & captions data")
            }
        });
    }
    body.push_str("</section>");

    body.push_str(&format!(
        "<section><h2>Model Metrics</h2><h3>Model Performance Metrics</h3><p>{}</p>{}</section>",
        case.metrics_description(),
        metrics_table(case.metrics())
    ));

    if case.offers_captioning() {
        body.push_str(&caption_section(case));
    }

    layout(store, case.title(), Some(case), &body).await
}

async fn xray_dataframes(store: &AssetStore, max_rows: usize) -> String {
    let mut html = format!(
        r#"<pre><code class="language-python">{}</code></pre>"#,
        escape_html(TEXT_PREPROCESSING_SNIPPET)
    );

    for (heading, columns) in [
        ("Unprocessed captions data", &UNPROCESSED_COLUMNS),
        ("Processed captions data", &PROCESSED_COLUMNS),
    ] {
        html.push_str(&format!("<h3>{}</h3>", heading));
        match load_columns(store, TRAIN_CAPTIONS_CSV, columns).await {
            Ok(table) => html.push_str(&data_table(&table, max_rows)),
            Err(e) => {
                tracing::warn!(error = %e, "dataframe unavailable");
                html.push_str(&unavailable(heading));
            }
        }
    }
    html
}

/// Upload form plus the script that posts to `/{slug}/caption`.
fn caption_section(case: UseCase) -> String {
    format!(
        r#"<section id="captioning">
    <h2>Image Captioning</h2>
    <p>Upload an image to generate a caption using the fine-tuned model.</p>
    <form id="uploadForm" data-endpoint="/{slug}/caption">
        <label class="upload-area">
            <span class="upload-text">Upload an image</span>
            <span class="upload-hint">PNG, JPG, JPEG</span>
            <input type="file" id="fileInput" name="image" accept=".png,.jpg,.jpeg">
        </label>
        <figure class="preview-container" id="previewContainer" hidden>
            <img id="previewImage" class="preview-image" alt="Uploaded Image">
            <figcaption>Uploaded Image</figcaption>
        </figure>
        <button type="submit" id="generateButton" disabled>Generate Caption</button>
    </form>
    <div class="loading" id="loading" hidden>Generating caption...</div>
    <div class="error" id="error" hidden></div>
    <div class="result" id="result" hidden>
        <div class="result-text" id="captionText"></div>
        <div class="meta-info">
            <span>Model: <span class="badge" id="modelName"></span></span>
            <span>Processing: <strong id="processingTime">--</strong>ms</span>
        </div>
    </div>
</section>
<script>{script}</script>"#,
        slug = case.slug(),
        script = UPLOAD_SCRIPT,
    )
}

const UPLOAD_SCRIPT: &str = r#"
const form = document.getElementById('uploadForm');
const fileInput = document.getElementById('fileInput');
const previewContainer = document.getElementById('previewContainer');
const previewImage = document.getElementById('previewImage');
const generateButton = document.getElementById('generateButton');
const loading = document.getElementById('loading');
const errorDiv = document.getElementById('error');
const result = document.getElementById('result');

fileInput.addEventListener('change', () => {
    const file = fileInput.files[0];
    result.hidden = true;
    errorDiv.hidden = true;
    if (!file) {
        previewContainer.hidden = true;
        generateButton.disabled = true;
        return;
    }
    const reader = new FileReader();
    reader.onload = (e) => { previewImage.src = e.target.result; };
    reader.readAsDataURL(file);
    previewContainer.hidden = false;
    generateButton.disabled = false;
});

form.addEventListener('submit', async (e) => {
    e.preventDefault();
    const file = fileInput.files[0];
    if (!file) return;

    const formData = new FormData();
    formData.append('image', file);

    loading.hidden = false;
    errorDiv.hidden = true;
    result.hidden = true;
    generateButton.disabled = true;

    try {
        const response = await fetch(form.dataset.endpoint, { method: 'POST', body: formData });
        const body = await response.json();
        if (!response.ok) {
            throw new Error(body.message || 'Caption request failed');
        }
        document.getElementById('captionText').textContent = body.caption;
        document.getElementById('modelName').textContent = body.model;
        document.getElementById('processingTime').textContent = body.processing_time_ms;
        result.hidden = false;
    } catch (error) {
        errorDiv.textContent = 'Error: ' + error.message;
        errorDiv.hidden = false;
    } finally {
        loading.hidden = true;
        generateButton.disabled = false;
    }
});
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_match_reference_values() {
        let values = |case: UseCase| {
            case.metrics()
                .iter()
                .map(|m| (m.metric, m.value))
                .collect::<Vec<_>>()
        };
        assert_eq!(
            values(UseCase::XRay),
            vec![("Accuracy", "85%"), ("Precision", "82%"), ("Recall", "88%"), ("F1 Score", "85%")]
        );
        assert_eq!(
            values(UseCase::Travel),
            vec![("Accuracy", "90%"), ("Precision", "88%"), ("Recall", "92%"), ("F1 Score", "90%")]
        );
        assert_eq!(
            values(UseCase::Cctv),
            vec![("Accuracy", "87%"), ("Precision", "85%"), ("Recall", "89%"), ("F1 Score", "86%")]
        );
    }

    #[test]
    fn test_slug_round_trip_and_unknown() {
        for case in UseCase::ALL {
            assert_eq!(UseCase::from_slug(case.slug()), Some(case));
        }
        assert_eq!(UseCase::from_slug("drone"), None);
    }

    #[test]
    fn test_only_xray_offers_captioning() {
        assert!(UseCase::XRay.offers_captioning());
        assert!(!UseCase::Travel.offers_captioning());
        assert!(!UseCase::Cctv.offers_captioning());
    }

    #[tokio::test]
    async fn test_travel_page_without_assets() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path(), dir.path().join("styles.css"));
        let html = render_use_case(&store, UseCase::Travel, 10).await;

        assert!(html.contains("<h2>Overview</h2>"));
        assert!(html.contains("travel guide captioning model"));
        assert!(html.contains("<td>Recall</td><td>92%</td>"));
        assert!(!html.contains("uploadForm"));
    }

    #[tokio::test]
    async fn test_xray_page_renders_dataframes_and_form() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(TRAIN_CAPTIONS_CSV),
            ",image,caption,processed\n0,a.png,Lungs <clear>.,lung clear\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(TEST_PREPROCESSED_CSV),
            "image,processed\nb.png,cardiomegali\n",
        )
        .unwrap();
        let store = AssetStore::new(dir.path(), dir.path().join("styles.css"));
        let html = render_use_case(&store, UseCase::XRay, 10).await;

        assert!(html.contains("<th>image</th><th>caption</th>"));
        assert!(html.contains("<th>caption</th><th>processed</th>"));
        assert!(html.contains("Lungs &lt;clear&gt;."));
        assert!(html.contains("cardiomegali"));
        assert!(html.contains(r#"data-endpoint="/xray/caption""#));
        assert!(html.contains("def preprocess_text(text):"));
    }

    #[tokio::test]
    async fn test_xray_page_survives_missing_csv() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path(), dir.path().join("styles.css"));
        let html = render_use_case(&store, UseCase::XRay, 10).await;
        assert!(html.contains("Unprocessed captions data is not available."));
        assert!(html.contains("<td>F1 Score</td><td>85%</td>"));
    }
}
