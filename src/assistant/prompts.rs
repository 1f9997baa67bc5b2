// Prompt templates for the census assistant
//
// Templates are versioned so logged answers can be traced back to the
// exact wording that produced them.

use std::collections::HashMap;

/// Prompt template structure
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: String,
    pub version: String,
    pub system: String,
    pub user_template: String,
}

impl PromptTemplate {
    /// Render the user template, replacing `{{name}}` placeholders
    ///
    /// Substitution is a single pass: placeholder syntax inside a substituted
    /// value is left as is. Unknown placeholders are kept verbatim.
    ///
    /// # Example
    /// ```
    /// use censo_api::assistant::prompts::PromptTemplate;
    /// use std::collections::HashMap;
    ///
    /// let template = PromptTemplate {
    ///     name: "greeting".to_string(),
    ///     version: "1.0.0".to_string(),
    ///     system: String::new(),
    ///     user_template: "Hola {{name}}".to_string(),
    /// };
    /// let vars = HashMap::from([("name", "Ana")]);
    /// assert_eq!(template.render(&vars), "Hola Ana");
    /// ```
    pub fn render(&self, variables: &HashMap<&str, &str>) -> String {
        let mut output = String::with_capacity(self.user_template.len());
        let mut rest = self.user_template.as_str();

        while let Some(start) = rest.find("{{") {
            output.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];
            match after_open.find("}}") {
                Some(end) => {
                    let key = after_open[..end].trim();
                    match variables.get(key) {
                        Some(value) => output.push_str(value),
                        None => output.push_str(&rest[start..start + 2 + end + 2]),
                    }
                    rest = &after_open[end + 2..];
                }
                None => {
                    output.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        output.push_str(rest);
        output
    }
}

pub mod library {
    use super::PromptTemplate;

    /// Turns a question into a single PostgreSQL SELECT statement
    ///
    /// Variables: `schema`, `question`
    pub fn sql_generation() -> PromptTemplate {
        PromptTemplate {
            name: "sql_generation".to_string(),
            version: "2.0.0".to_string(),
            system: "Eres un asistente experto en SQL para PostgreSQL. Respondes únicamente \
                     con una consulta SQL de solo lectura, sin explicaciones."
                .to_string(),
            user_template: r#"Tu tarea es generar una consulta SQL basada en el esquema de la base de datos y la pregunta del usuario.

### ESQUEMA DE LA BASE DE DATOS ###
{{schema}}

### REGLAS DE GENERACIÓN DE SQL ###
- Solo genera la consulta SQL, en dialecto PostgreSQL.
- No incluyas explicaciones, comentarios, markdown (```sql) ni texto adicional.
- Genera una sola sentencia, de tipo SELECT (se permite WITH ... SELECT).
- NUNCA uses DROP, DELETE, UPDATE, INSERT, CREATE, ALTER ni SELECT INTO.
- Si la pregunta no se puede responder con el esquema, responde exactamente "ERROR: Imposible de responder".

### REGLAS DE LÓGICA DE NEGOCIO ###
1. La columna 'habitante.sexo' usa 'F' para mujeres y 'M' para hombres.
2. La columna 'habitante.parentesco_con_jefe_familia' usa valores como 'Jefe(a) de Familia', 'Cónyuge', 'Hijo(a)'.
3. El número de habitantes de una vivienda se obtiene contando filas de 'habitante' (COUNT); no existe una columna con ese total.
4. Las búsquedas de nombres (municipios, localidades, personas, etc.) deben ser insensibles a mayúsculas usando LOWER().

### EJEMPLOS (Pregunta -> SQL) ###
Pregunta: ¿Cuántos habitantes hay en total?
SQL: SELECT COUNT(*) FROM habitante;

Pregunta: ¿Cuántas mujeres hay?
SQL: SELECT COUNT(*) FROM habitante WHERE sexo = 'F';

Pregunta: ¿Cuántos hombres viven en Saltillo?
SQL: SELECT COUNT(t1.id) FROM habitante AS t1 JOIN vivienda AS t2 ON t1.vivienda_id = t2.id JOIN localidad AS t3 ON t2.localidad_id = t3.id JOIN municipio AS t4 ON t3.municipio_id = t4.id WHERE t1.sexo = 'M' AND LOWER(t4.nombre) = 'saltillo';

Pregunta: ¿Cuál es el promedio de habitantes por vivienda?
SQL: SELECT AVG(total) FROM (SELECT COUNT(t2.id) AS total FROM vivienda AS t1 LEFT JOIN habitante AS t2 ON t2.vivienda_id = t1.id GROUP BY t1.id) AS conteo;

Pregunta: ¿Cuál es el promedio de edad de las mujeres en Torreón?
SQL: SELECT AVG(t1.edad) FROM habitante AS t1 JOIN vivienda AS t2 ON t1.vivienda_id = t2.id JOIN localidad AS t3 ON t2.localidad_id = t3.id JOIN municipio AS t4 ON t3.municipio_id = t4.id WHERE t1.sexo = 'F' AND LOWER(t4.nombre) = 'torreón';

Pregunta: ¿Cuántas viviendas de 'Vivienda de ladrillo' hay?
SQL: SELECT COUNT(t1.id) FROM vivienda AS t1 JOIN tipo_vivienda AS t2 ON t1.tipo_vivienda_id = t2.id WHERE LOWER(t2.nombre) = 'vivienda de ladrillo';

Pregunta: ¿Qué actividades económicas sostienen la vivienda de 'Ana García'?
SQL: SELECT t3.nombre FROM vivienda AS t1 JOIN vivienda_actividad AS t2 ON t1.id = t2.vivienda_id JOIN actividad_economica AS t3 ON t2.actividad_id = t3.id JOIN habitante AS t4 ON t1.id = t4.vivienda_id WHERE LOWER(t4.nombre_completo) = 'ana garcía';

### PREGUNTA DEL USUARIO ###
{{question}}

### CONSULTA SQL GENERADA ###
"#
            .to_string(),
        }
    }

    /// Phrases a query result as a short natural-language answer
    ///
    /// Variables: `question`, `rows`
    pub fn answer_phrasing() -> PromptTemplate {
        PromptTemplate {
            name: "answer_phrasing".to_string(),
            version: "1.0.0".to_string(),
            system: "Eres un asistente de chat amigable y servicial que explica datos del censo."
                .to_string(),
            user_template: r#"La pregunta original del usuario fue: "{{question}}"
Se ejecutó una consulta en la base de datos y el resultado (JSON) fue: {{rows}}

Por favor, responde la pregunta original del usuario en lenguaje natural,
basándote en esos resultados. Sé breve y directo.
Si el resultado está vacío o es '[]', di que no se encontraron datos.
"#
            .to_string(),
        }
    }
}
